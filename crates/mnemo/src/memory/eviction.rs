//! Composite-score eviction for long-term storage
//!
//! When long-term storage is over capacity, entries are ranked by a
//! weighted sum of importance, access count and recency and evicted from the
//! low end. The ordering is the pairwise weighted-difference comparison
//!
//! ```text
//! w_imp * (a.importance - b.importance)
//!   + w_acc * (a.access_count - b.access_count)
//!   + w_rec * (a.last_access_ms - b.last_access_ms)
//! ```
//!
//! which, being linear, is the same as sorting by a per-entry key. Recency
//! is taken relative to the oldest entry to keep the key well inside f64
//! precision.

use std::collections::HashMap;

use crate::config::EvictionWeights;
use crate::memory::types::MemoryItem;

/// Eviction key for one entry. Lower keys are evicted first.
pub fn composite_score(item: &MemoryItem, oldest_access_ms: i64, weights: &EvictionWeights) -> f64 {
    let recency_ms = (item.last_access.timestamp_millis() - oldest_access_ms) as f64;
    weights.importance * item.importance
        + weights.access * f64::from(item.access_count)
        + weights.recency * recency_ms
}

/// Keys to evict so that at most `capacity` entries remain, lowest score first.
///
/// Ties fall back to key order so repeated runs evict the same entries.
pub fn eviction_candidates(
    entries: &HashMap<String, MemoryItem>,
    capacity: usize,
    weights: &EvictionWeights,
) -> Vec<String> {
    if entries.len() <= capacity {
        return Vec::new();
    }

    let oldest_access_ms = entries
        .values()
        .map(|item| item.last_access.timestamp_millis())
        .min()
        .unwrap_or(0);

    let mut scored: Vec<(&String, f64)> = entries
        .iter()
        .map(|(key, item)| (key, composite_score(item, oldest_access_ms, weights)))
        .collect();

    scored.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    scored
        .into_iter()
        .take(entries.len() - capacity)
        .map(|(key, _)| key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn entry(importance: f64, access_count: u32, ms_ago: i64) -> MemoryItem {
        let now = Utc::now();
        let mut item = MemoryItem::new_at("x".into(), importance, now);
        item.access_count = access_count;
        item.last_access = now - Duration::milliseconds(ms_ago);
        item
    }

    #[test]
    fn test_under_capacity_evicts_nothing() {
        let mut entries = HashMap::new();
        entries.insert("a".to_string(), entry(0.1, 0, 0));
        assert!(eviction_candidates(&entries, 1, &EvictionWeights::default()).is_empty());
    }

    #[test]
    fn test_lowest_importance_goes_first() {
        let mut entries = HashMap::new();
        entries.insert("d".to_string(), entry(0.9, 0, 0));
        entries.insert("e".to_string(), entry(0.1, 0, 0));
        entries.insert("f".to_string(), entry(0.5, 0, 0));
        entries.insert("g".to_string(), entry(0.8, 0, 0));
        let evicted = eviction_candidates(&entries, 3, &EvictionWeights::default());
        assert_eq!(evicted, vec!["e".to_string()]);
    }

    #[test]
    fn test_access_count_outweighs_small_importance_gap() {
        let mut entries = HashMap::new();
        // 0.3 + 0.1 * 5 = 0.8 beats 0.6
        entries.insert("used".to_string(), entry(0.3, 5, 0));
        entries.insert("idle".to_string(), entry(0.6, 0, 0));
        let evicted = eviction_candidates(&entries, 1, &EvictionWeights::default());
        assert_eq!(evicted, vec!["idle".to_string()]);
    }

    #[test]
    fn test_recency_weight_is_per_millisecond() {
        let mut entries = HashMap::new();
        // Two seconds fresher adds 2.0 to the key, more than the importance gap
        entries.insert("stale".to_string(), entry(0.9, 0, 2_000));
        entries.insert("fresh".to_string(), entry(0.1, 0, 0));
        let evicted = eviction_candidates(&entries, 1, &EvictionWeights::default());
        assert_eq!(evicted, vec!["stale".to_string()]);

        let no_recency = EvictionWeights {
            recency: 0.0,
            ..EvictionWeights::default()
        };
        let evicted = eviction_candidates(&entries, 1, &no_recency);
        assert_eq!(evicted, vec!["fresh".to_string()]);
    }

    #[test]
    fn test_zero_capacity_evicts_all() {
        let mut entries = HashMap::new();
        entries.insert("a".to_string(), entry(0.5, 0, 0));
        entries.insert("b".to_string(), entry(0.5, 0, 0));
        let evicted = eviction_candidates(&entries, 0, &EvictionWeights::default());
        assert_eq!(evicted, vec!["a".to_string(), "b".to_string()]);
    }
}
