//! Tiered memory store
//!
//! Owns the short-term ring buffer, the bounded long-term store with its
//! importance index, and the episodic log. Every public mutating method
//! leaves each tier within its configured capacity.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::MemoryConfig;
use crate::memory::eviction::eviction_candidates;
use crate::memory::importance::{active_topics, calculate_importance, emotional_tags};
use crate::memory::relevance::score_payload;
use crate::memory::snapshot::{ConfigSnapshot, MEMORY_SNAPSHOT_VERSION, MemorySnapshot};
use crate::memory::types::{
    DecayReport, Episode, EpisodeContext, MemoryItem, MemoryStats, Payload, RecallResult, Tier,
    TierFilter,
};
use crate::text::{TextProcessor, WhitespaceProcessor};

/// Importance used by [`MemoryStore::add_to_long_term`]
pub const DEFAULT_LONG_TERM_IMPORTANCE: f64 = 0.5;

/// Importance added on recall once an item passes the consolidation threshold
const ACCESS_REINFORCEMENT: f64 = 0.1;

/// Decayed non-consolidated items below this importance are purged
const PURGE_THRESHOLD: f64 = 0.1;

/// Short-term items copied into the context of a new episode
const EPISODE_CONTEXT_ITEMS: usize = 3;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Prefix for long-term keys created by promotion
pub const PROMOTED_KEY_PREFIX: &str = "stm_";

pub struct MemoryStore {
    config: MemoryConfig,
    short_term: VecDeque<MemoryItem>,
    long_term: HashMap<String, MemoryItem>,
    /// Mirror of each long-term item's importance, keyed identically
    weights: HashMap<String, f64>,
    episodic: VecDeque<Episode>,
    processor: Arc<dyn TextProcessor>,
}

enum Hit {
    Short(usize),
    Long(String),
    Episode(usize),
}

impl MemoryStore {
    pub fn new(config: MemoryConfig) -> Self {
        Self::with_processor(config, Arc::new(WhitespaceProcessor))
    }

    pub fn with_processor(config: MemoryConfig, processor: Arc<dyn TextProcessor>) -> Self {
        Self {
            config,
            short_term: VecDeque::new(),
            long_term: HashMap::new(),
            weights: HashMap::new(),
            episodic: VecDeque::new(),
            processor,
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn processor(&self) -> &Arc<dyn TextProcessor> {
        &self.processor
    }

    /// Add content to short-term memory with heuristic importance.
    ///
    /// Overflow evicts the oldest item; evicted items above the promotion
    /// threshold are copied into long-term storage.
    pub fn add_to_short_term(&mut self, content: impl Into<Payload>) -> Uuid {
        let content = content.into();
        let importance = calculate_importance(&content);
        self.push_short_term(MemoryItem::new(content, importance))
    }

    /// Add content to short-term memory with an explicit importance
    pub fn add_to_short_term_with_importance(
        &mut self,
        content: impl Into<Payload>,
        importance: f64,
    ) -> Uuid {
        self.push_short_term(MemoryItem::new(content.into(), importance))
    }

    fn push_short_term(&mut self, item: MemoryItem) -> Uuid {
        let id = item.id;
        self.short_term.push_back(item);

        while self.short_term.len() > self.config.short_term_capacity {
            let Some(evicted) = self.short_term.pop_front() else {
                break;
            };
            if evicted.importance > self.config.promotion_threshold {
                self.promote(&evicted);
            } else {
                tracing::debug!(id = %evicted.id, "Dropped short-term item");
            }
        }

        id
    }

    fn promote(&mut self, item: &MemoryItem) {
        let key = format!("{PROMOTED_KEY_PREFIX}{}", item.id);
        tracing::info!(
            key = %key,
            importance = item.importance,
            "Promoting short-term item to long-term"
        );
        self.insert_long_term(key, item.promoted());
    }

    /// Insert or overwrite a long-term entry with the default importance
    pub fn add_to_long_term(&mut self, key: impl Into<String>, value: impl Into<Payload>) -> String {
        self.add_to_long_term_with_importance(key, value, DEFAULT_LONG_TERM_IMPORTANCE)
    }

    /// Insert or overwrite a long-term entry.
    ///
    /// Overwriting keeps the entry's id, creation time, access count and
    /// consolidation flag.
    pub fn add_to_long_term_with_importance(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Payload>,
        importance: f64,
    ) -> String {
        let key = key.into();
        let now = Utc::now();
        let item = match self.long_term.remove(&key) {
            Some(mut existing) => {
                existing.content = value.into();
                existing.set_importance(importance);
                existing.last_access = now;
                existing
            }
            None => MemoryItem::new_at(value.into(), importance, now),
        };
        self.insert_long_term(key.clone(), item);
        key
    }

    fn insert_long_term(&mut self, key: String, item: MemoryItem) {
        self.weights.insert(key.clone(), item.importance);
        self.long_term.insert(key, item);
        self.enforce_long_term_capacity();
    }

    fn enforce_long_term_capacity(&mut self) {
        if self.long_term.len() <= self.config.long_term_capacity {
            return;
        }
        self.verify_weight_index();

        let evicted = eviction_candidates(
            &self.long_term,
            self.config.long_term_capacity,
            &self.config.eviction,
        );
        for key in evicted {
            self.long_term.remove(&key);
            self.weights.remove(&key);
            tracing::debug!(key = %key, "Evicted long-term entry");
        }
    }

    /// Check the importance index against the store and rebuild it on any
    /// mismatch. Returns true if a rebuild happened.
    pub fn verify_weight_index(&mut self) -> bool {
        let consistent = self.weights.len() == self.long_term.len()
            && self
                .long_term
                .iter()
                .all(|(key, item)| self.weights.get(key) == Some(&item.importance));
        if consistent {
            return false;
        }

        tracing::warn!(
            index_entries = self.weights.len(),
            store_entries = self.long_term.len(),
            "Importance index out of sync with long-term store, rebuilding"
        );
        self.rebuild_weight_index();
        true
    }

    fn rebuild_weight_index(&mut self) {
        self.weights = self
            .long_term
            .iter()
            .map(|(key, item)| (key.clone(), item.importance))
            .collect();
    }

    /// Record an episode with a snapshot of recent short-term context
    pub fn add_episodic_memory(&mut self, event: impl Into<Payload>) -> Uuid {
        let event = event.into();
        let recent: Vec<Payload> = self
            .short_term
            .iter()
            .rev()
            .take(EPISODE_CONTEXT_ITEMS)
            .rev()
            .map(|item| item.content.clone())
            .collect();
        let recent_refs: Vec<&Payload> = recent.iter().collect();
        let topics = active_topics(&recent_refs, self.processor.as_ref());

        let episode = Episode {
            id: Uuid::new_v4(),
            importance: calculate_importance(&event),
            emotional_tags: emotional_tags(&event, self.processor.as_ref()),
            timestamp: Utc::now(),
            context: EpisodeContext {
                recent,
                active_topics: topics,
            },
            event,
        };
        let id = episode.id;

        self.episodic.push_back(episode);
        while self.episodic.len() > self.config.episodic_capacity {
            self.episodic.pop_front();
        }

        id
    }

    /// Search the selected tiers, best match first.
    ///
    /// Results at or below the relevance floor are dropped. Returned
    /// short-term and long-term items are marked accessed, and items past
    /// the consolidation threshold gain importance.
    pub fn recall(&mut self, query: &str, filter: TierFilter) -> Vec<RecallResult> {
        self.recall_at(query, filter, Utc::now())
    }

    pub fn recall_at(
        &mut self,
        query: &str,
        filter: TierFilter,
        now: DateTime<Utc>,
    ) -> Vec<RecallResult> {
        let floor = self.config.relevance_floor;
        let mut hits: Vec<(Hit, f64)> = Vec::new();

        if filter.includes(Tier::ShortTerm) {
            for (i, item) in self.short_term.iter().enumerate() {
                let score = score_payload(query, &item.content);
                if score > floor {
                    hits.push((Hit::Short(i), score));
                }
            }
        }

        if filter.includes(Tier::LongTerm) {
            let mut keys: Vec<&String> = self.long_term.keys().collect();
            keys.sort();
            for key in keys {
                let score = score_payload(query, &self.long_term[key].content);
                if score > floor {
                    hits.push((Hit::Long(key.clone()), score));
                }
            }
        }

        if filter.includes(Tier::Episodic) {
            for (i, episode) in self.episodic.iter().enumerate() {
                let score = score_payload(query, &episode.event);
                if score > floor {
                    hits.push((Hit::Episode(i), score));
                }
            }
        }

        // Stable sort keeps tier/insertion order among equal scores
        hits.sort_by(|a, b| b.1.total_cmp(&a.1));

        let threshold = self.config.consolidation_threshold;
        let results: Vec<RecallResult> = hits
            .into_iter()
            .filter_map(|(hit, relevance)| match hit {
                Hit::Short(i) => {
                    let item = self.short_term.get_mut(i)?;
                    reinforce(item, now, threshold);
                    Some(RecallResult {
                        tier: Tier::ShortTerm,
                        key: None,
                        id: item.id,
                        content: item.content.clone(),
                        relevance,
                        importance: item.importance,
                        timestamp: item.created_at,
                    })
                }
                Hit::Long(key) => {
                    let item = self.long_term.get_mut(&key)?;
                    reinforce(item, now, threshold);
                    self.weights.insert(key.clone(), item.importance);
                    Some(RecallResult {
                        tier: Tier::LongTerm,
                        key: Some(key),
                        id: item.id,
                        content: item.content.clone(),
                        relevance,
                        importance: item.importance,
                        timestamp: item.created_at,
                    })
                }
                Hit::Episode(i) => {
                    let episode = self.episodic.get(i)?;
                    Some(RecallResult {
                        tier: Tier::Episodic,
                        key: None,
                        id: episode.id,
                        content: episode.event.clone(),
                        relevance,
                        importance: episode.importance,
                        timestamp: episode.timestamp,
                    })
                }
            })
            .collect();

        tracing::debug!(query, results = results.len(), "Recall complete");
        results
    }

    /// Decay long-term items idle longer than the decay horizon
    pub fn apply_decay(&mut self) -> DecayReport {
        self.apply_decay_at(Utc::now())
    }

    pub fn apply_decay_at(&mut self, now: DateTime<Utc>) -> DecayReport {
        // Float milliseconds so any configured horizon stays in range
        let horizon_ms = self.config.decay_horizon_hours as f64 * MS_PER_HOUR;
        let rate = self.config.decay_rate;

        let mut report = DecayReport::default();
        for (key, item) in self.long_term.iter_mut() {
            let elapsed_ms = (now - item.last_access).num_milliseconds() as f64;
            if elapsed_ms <= horizon_ms {
                continue;
            }
            let elapsed_ratio = elapsed_ms / horizon_ms.max(1.0);
            let factor = (-rate * elapsed_ratio).exp().min(1.0);
            item.importance *= factor;
            self.weights.insert(key.clone(), item.importance);
            report.decayed += 1;

            if item.importance < PURGE_THRESHOLD && !item.consolidated {
                report.purged.push(key.clone());
            }
        }

        report.purged.sort();
        for key in &report.purged {
            self.long_term.remove(key);
            self.weights.remove(key);
            tracing::info!(key = %key, "Purged decayed long-term entry");
        }

        tracing::debug!(
            decayed = report.decayed,
            purged = report.purged.len(),
            "Decay pass complete"
        );
        report
    }

    pub fn get(&self, key: &str) -> Option<&MemoryItem> {
        self.long_term.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<MemoryItem> {
        self.weights.remove(key);
        self.long_term.remove(key)
    }

    /// Importance recorded in the index for a long-term key
    pub fn weight(&self, key: &str) -> Option<f64> {
        self.weights.get(key).copied()
    }

    pub fn short_term(&self) -> &VecDeque<MemoryItem> {
        &self.short_term
    }

    pub fn long_term(&self) -> &HashMap<String, MemoryItem> {
        &self.long_term
    }

    pub fn episodes(&self) -> &VecDeque<Episode> {
        &self.episodic
    }

    pub fn len(&self, tier: Tier) -> usize {
        match tier {
            Tier::ShortTerm => self.short_term.len(),
            Tier::LongTerm => self.long_term.len(),
            Tier::Episodic => self.episodic.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.short_term.is_empty() && self.long_term.is_empty() && self.episodic.is_empty()
    }

    pub fn clear(&mut self, filter: TierFilter) {
        if filter.includes(Tier::ShortTerm) {
            self.short_term.clear();
        }
        if filter.includes(Tier::LongTerm) {
            self.long_term.clear();
            self.weights.clear();
        }
        if filter.includes(Tier::Episodic) {
            self.episodic.clear();
        }
    }

    pub fn stats(&self) -> MemoryStats {
        let long_term = self.long_term.len();
        let mean_long_term_importance = if long_term == 0 {
            0.0
        } else {
            self.long_term.values().map(|i| i.importance).sum::<f64>() / long_term as f64
        };

        MemoryStats {
            short_term: self.short_term.len(),
            short_term_capacity: self.config.short_term_capacity,
            long_term,
            long_term_capacity: self.config.long_term_capacity,
            episodic: self.episodic.len(),
            episodic_capacity: self.config.episodic_capacity,
            consolidated: self.long_term.values().filter(|i| i.consolidated).count(),
            mean_long_term_importance,
        }
    }

    /// Capture all tiers, mirrors and config
    pub fn save(&self) -> MemorySnapshot {
        let mut long_term: Vec<(String, MemoryItem)> = self
            .long_term
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        long_term.sort_by(|a, b| a.0.cmp(&b.0));

        let memory_weights = long_term.iter().map(|(k, v)| (k.clone(), v.importance)).collect();
        let access_count = long_term.iter().map(|(k, v)| (k.clone(), v.access_count)).collect();
        let last_access = long_term.iter().map(|(k, v)| (k.clone(), v.last_access)).collect();

        MemorySnapshot {
            version: MEMORY_SNAPSHOT_VERSION,
            short_term: Some(self.short_term.iter().cloned().collect()),
            long_term: Some(long_term),
            episodic: Some(self.episodic.iter().cloned().collect()),
            memory_weights: Some(memory_weights),
            access_count: Some(access_count),
            last_access: Some(last_access),
            config: Some(ConfigSnapshot::capture(&self.config)),
            timestamp: Some(Utc::now()),
        }
    }

    /// Restore from a snapshot. Missing fields keep their current values.
    ///
    /// Mirror maps are applied onto matching long-term items, the index is
    /// rebuilt, and capacities are re-enforced without promotion.
    pub fn load(&mut self, snapshot: MemorySnapshot) {
        if snapshot.version != MEMORY_SNAPSHOT_VERSION {
            tracing::warn!(
                version = snapshot.version,
                expected = MEMORY_SNAPSHOT_VERSION,
                "Loading memory snapshot with unexpected version"
            );
        }

        if let Some(config) = &snapshot.config {
            config.apply_to(&mut self.config);
        }
        if let Some(items) = snapshot.short_term {
            self.short_term = items.into();
        }
        if let Some(entries) = snapshot.long_term {
            self.long_term = entries.into_iter().collect();
        }
        if let Some(episodes) = snapshot.episodic {
            self.episodic = episodes.into();
        }

        for (key, importance) in snapshot.memory_weights.into_iter().flatten() {
            if let Some(item) = self.long_term.get_mut(&key) {
                item.set_importance(importance);
            }
        }
        for (key, count) in snapshot.access_count.into_iter().flatten() {
            if let Some(item) = self.long_term.get_mut(&key) {
                item.access_count = count;
            }
        }
        for (key, at) in snapshot.last_access.into_iter().flatten() {
            if let Some(item) = self.long_term.get_mut(&key) {
                item.last_access = at;
            }
        }

        self.rebuild_weight_index();

        while self.short_term.len() > self.config.short_term_capacity {
            self.short_term.pop_front();
        }
        self.enforce_long_term_capacity();
        while self.episodic.len() > self.config.episodic_capacity {
            self.episodic.pop_front();
        }

        tracing::info!(
            short_term = self.short_term.len(),
            long_term = self.long_term.len(),
            episodic = self.episodic.len(),
            "Loaded memory snapshot"
        );
    }
}

fn reinforce(item: &mut MemoryItem, now: DateTime<Utc>, threshold: u32) {
    item.mark_accessed(now);
    if item.access_count > threshold {
        item.set_importance(item.importance + ACCESS_REINFORCEMENT);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("config", &self.config)
            .field("short_term", &self.short_term.len())
            .field("long_term", &self.long_term.len())
            .field("episodic", &self.episodic.len())
            .field("processor", &self.processor.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store(short: usize, long: usize, episodic: usize) -> MemoryStore {
        MemoryStore::new(MemoryConfig::with_capacities(short, long, episodic))
    }

    #[test]
    fn test_short_term_fifo_without_promotion() {
        let mut store = store(2, 10, 10);
        store.add_to_short_term_with_importance("A", 0.2);
        store.add_to_short_term_with_importance("B", 0.9);
        store.add_to_short_term_with_importance("C", 0.3);

        let contents: Vec<String> = store.short_term().iter().map(|i| i.content.to_string()).collect();
        assert_eq!(contents, vec!["B", "C"]);
        assert!(store.long_term().is_empty());
    }

    #[test]
    fn test_promotion_on_eviction() {
        let mut store = store(2, 10, 10);
        let b = store.add_to_short_term_with_importance("B", 0.9);
        store.add_to_short_term_with_importance("C", 0.3);
        store.add_to_short_term_with_importance("D", 0.3);

        assert_eq!(store.long_term().len(), 1);
        let promoted = store.get(&format!("{PROMOTED_KEY_PREFIX}{b}")).unwrap();
        assert!(promoted.consolidated);
        assert_ne!(promoted.id, b);
        assert_eq!(promoted.content, Payload::from("B"));
    }

    #[test]
    fn test_promotion_threshold_is_strict() {
        let mut store = store(1, 10, 10);
        store.add_to_short_term_with_importance("edge", 0.7);
        store.add_to_short_term_with_importance("next", 0.1);
        assert!(store.long_term().is_empty());
    }

    #[test]
    fn test_zero_short_term_capacity_promotes_immediately() {
        let mut store = store(0, 10, 10);
        store.add_to_short_term_with_importance("urgent", 0.95);
        assert!(store.short_term().is_empty());
        assert_eq!(store.long_term().len(), 1);
    }

    #[test]
    fn test_long_term_composite_eviction() {
        let mut store = store(10, 3, 10);
        store.add_to_long_term_with_importance("D", "d", 0.9);
        store.add_to_long_term_with_importance("E", "e", 0.1);
        store.add_to_long_term_with_importance("F", "f", 0.5);
        store.add_to_long_term_with_importance("G", "g", 0.8);

        let mut keys: Vec<&String> = store.long_term().keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["D", "F", "G"]);
        assert!(store.weight("E").is_none());
    }

    #[test]
    fn test_overwrite_keeps_history() {
        let mut store = store(10, 10, 10);
        store.add_to_long_term("k", "first");
        store.recall("first", TierFilter::All);
        let id = store.get("k").unwrap().id;

        store.add_to_long_term_with_importance("k", "second", 0.9);
        let item = store.get("k").unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.access_count, 1);
        assert_eq!(item.content, Payload::from("second"));
        assert_eq!(store.weight("k"), Some(0.9));
    }

    #[test]
    fn test_corrupt_weight_index_is_rebuilt() {
        let mut store = store(10, 2, 10);
        store.add_to_long_term_with_importance("a", "a", 0.9);
        store.add_to_long_term_with_importance("b", "b", 0.2);
        store.weights.insert("a".to_string(), 0.0);
        store.weights.insert("ghost".to_string(), 0.3);

        assert!(store.verify_weight_index());
        assert_eq!(store.weight("a"), Some(0.9));
        assert!(store.weight("ghost").is_none());
        assert!(!store.verify_weight_index());
    }

    #[test]
    fn test_episode_context_snapshot() {
        let mut store = store(10, 10, 10);
        for text in ["one", "rust traits", "rust lifetimes", "rust macros"] {
            store.add_to_short_term(text);
        }
        store.add_episodic_memory("I was so happy to ship it");

        let episode = store.episodes().back().unwrap();
        assert_eq!(episode.context.recent.len(), 3);
        assert_eq!(episode.context.recent[0], Payload::from("rust traits"));
        assert_eq!(episode.context.active_topics[0], "rust");
        assert_eq!(episode.emotional_tags["joy"], 1);
    }

    #[test]
    fn test_episodic_trims_oldest() {
        let mut store = store(10, 10, 2);
        store.add_episodic_memory("first");
        store.add_episodic_memory("second");
        store.add_episodic_memory("third");
        let events: Vec<String> = store.episodes().iter().map(|e| e.event.to_string()).collect();
        assert_eq!(events, vec!["second", "third"]);
        assert!(store.long_term().is_empty());
    }

    #[test]
    fn test_recall_filters_and_orders() {
        let mut store = store(10, 10, 10);
        store.add_to_short_term("rust ownership rules");
        store.add_to_long_term("lt", "rust");
        store.add_episodic_memory("baking bread");

        let results = store.recall("rust ownership", TierFilter::All);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].tier, Tier::ShortTerm);
        assert!(results[0].relevance >= results[1].relevance);
        assert!(results.iter().all(|r| r.relevance > 0.1));

        let episodic = store.recall("rust", TierFilter::Only(Tier::Episodic));
        assert!(episodic.is_empty());
    }

    #[test]
    fn test_recall_reinforces_past_threshold() {
        let mut config = MemoryConfig::with_capacities(10, 10, 10);
        config.consolidation_threshold = 2;
        let mut store = MemoryStore::new(config);
        store.add_to_long_term_with_importance("k", "rust", 0.5);

        store.recall("rust", TierFilter::All);
        store.recall("rust", TierFilter::All);
        assert_eq!(store.get("k").unwrap().importance, 0.5);

        store.recall("rust", TierFilter::All);
        let item = store.get("k").unwrap();
        assert_eq!(item.access_count, 3);
        assert!((item.importance - 0.6).abs() < 1e-9);
        assert_eq!(store.weight("k"), Some(item.importance));
    }

    #[test]
    fn test_decay_and_purge() {
        let mut store = store(10, 10, 10);
        store.add_to_long_term_with_importance("faint", "x", 0.11);
        store.add_to_long_term_with_importance("strong", "y", 0.9);

        let later = Utc::now() + Duration::hours(48);
        let report = store.apply_decay_at(later);

        assert_eq!(report.decayed, 2);
        assert_eq!(report.purged, vec!["faint".to_string()]);
        let strong = store.get("strong").unwrap().importance;
        assert!(strong < 0.9);
        assert!((strong - 0.9 * (-0.2f64).exp()).abs() < 1e-3);
        assert_eq!(store.weight("strong"), Some(strong));
    }

    #[test]
    fn test_decay_skips_recent_and_spares_consolidated() {
        let mut store = store(0, 10, 10);
        let id = store.add_to_short_term_with_importance("kept", 0.75);
        store.add_to_long_term_with_importance("recent", "z", 0.05);

        // Far enough out that the promoted copy falls below the purge threshold
        let much_later = Utc::now() + Duration::days(60);
        let report = store.apply_decay_at(much_later);
        let key = format!("{PROMOTED_KEY_PREFIX}{id}");
        assert!(store.get(&key).unwrap().importance < 0.1);
        assert!(report.purged.contains(&"recent".to_string()));

        let mut fresh = MemoryStore::default();
        fresh.add_to_long_term_with_importance("recent", "z", 0.05);
        let report = fresh.apply_decay();
        assert_eq!(report.decayed, 0);
        assert!(fresh.get("recent").is_some());
    }

    #[test]
    fn test_stats() {
        let mut store = store(10, 10, 10);
        store.add_to_long_term_with_importance("a", "a", 0.4);
        store.add_to_long_term_with_importance("b", "b", 0.8);
        store.add_to_short_term("s");
        let stats = store.stats();
        assert_eq!(stats.long_term, 2);
        assert_eq!(stats.short_term, 1);
        assert!((stats.mean_long_term_importance - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_save_load_round_trip_preserves_tiers() {
        let mut source = store(3, 3, 3);
        source.add_to_short_term("alpha");
        source.add_to_long_term_with_importance("k", "beta", 0.6);
        source.add_episodic_memory("gamma");

        let mut target = MemoryStore::default();
        target.load(source.save());

        assert_eq!(target.config().short_term_capacity, 3);
        assert_eq!(target.short_term(), source.short_term());
        assert_eq!(target.get("k"), source.get("k"));
        assert_eq!(target.episodes(), source.episodes());
        assert_eq!(target.weight("k"), Some(0.6));
    }

    #[test]
    fn test_partial_load_keeps_existing_state() {
        let mut store = store(5, 5, 5);
        store.add_to_short_term("kept");
        store.add_to_long_term_with_importance("k", "v", 0.5);

        store.load(MemorySnapshot {
            memory_weights: Some(vec![("k".to_string(), 0.9)]),
            access_count: Some(vec![("k".to_string(), 4)]),
            ..MemorySnapshot::default()
        });

        assert_eq!(store.short_term().len(), 1);
        assert_eq!(store.get("k").unwrap().importance, 0.9);
        assert_eq!(store.get("k").unwrap().access_count, 4);
        assert_eq!(store.weight("k"), Some(0.9));
        assert_eq!(store.config().short_term_capacity, 5);
    }

    #[test]
    fn test_load_enforces_capacities() {
        let mut source = store(5, 5, 5);
        for i in 0..5 {
            source.add_to_short_term(format!("item {i}"));
        }
        let mut snapshot = source.save();
        snapshot.config = Some(ConfigSnapshot {
            short_term_capacity: Some(2),
            ..ConfigSnapshot::default()
        });

        let mut target = MemoryStore::default();
        target.load(snapshot);
        assert_eq!(target.short_term().len(), 2);
        assert!(target.long_term().is_empty());
    }
}
