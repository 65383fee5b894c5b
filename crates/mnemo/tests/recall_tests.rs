//! Integration tests for lexical recall
//!
//! Results come back best-first, nothing at or below the relevance floor is
//! returned, and recalled items are reinforced.

use mnemo_core::memory::relevance::score;
use mnemo_core::memory::{Tier, TierFilter};
use mnemo_core::testing::store_with_capacities;
use proptest::prelude::*;

fn populated_store() -> mnemo_core::MemoryStore {
    let mut store = store_with_capacities(10, 10, 10);
    store.add_to_short_term("learning rust this week");
    store.add_to_long_term("lang", "rust programming language");
    store.add_to_long_term("rust", "rust");
    store.add_to_long_term("food", "cooking pasta");
    store.add_episodic_memory("finished the rust language book");
    store
}

proptest! {
    #[test]
    fn recall_is_sorted_and_above_floor(query in "[a-z]{1,6}( [a-z]{1,6}){0,3}") {
        let mut store = populated_store();
        let results = store.recall(&query, TierFilter::All);

        for pair in results.windows(2) {
            prop_assert!(pair[0].relevance >= pair[1].relevance);
        }
        for result in &results {
            prop_assert!(result.relevance > 0.1);
            prop_assert!(result.relevance <= 1.0);
        }
    }
}

#[test]
fn test_recall_orders_by_relevance() {
    let mut store = populated_store();
    let results = store.recall("rust language", TierFilter::Only(Tier::LongTerm));

    let keys: Vec<Option<&str>> = results.iter().map(|r| r.key.as_deref()).collect();
    assert_eq!(keys, vec![Some("lang"), Some("rust")]);
    assert_eq!(results[0].relevance, 1.0);
    assert_eq!(results[1].relevance, 0.5);
}

#[test]
fn test_shared_token_across_languages() {
    let mut store = store_with_capacities(10, 10, 10);
    store.add_to_long_term("ai", "AI là trí tuệ nhân tạo");

    let results = store.recall("AI machine learning", TierFilter::All);
    assert_eq!(results.len(), 1);
    assert!(results[0].relevance > 0.0);
    assert!((score("AI machine learning", "AI là trí tuệ nhân tạo") - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_tier_filter_limits_search() {
    let mut store = populated_store();

    let episodic = store.recall("rust", TierFilter::Only(Tier::Episodic));
    assert_eq!(episodic.len(), 1);
    assert!(episodic.iter().all(|r| r.tier == Tier::Episodic && r.key.is_none()));

    let all = store.recall("rust", TierFilter::All);
    for tier in [Tier::ShortTerm, Tier::LongTerm, Tier::Episodic] {
        assert!(all.iter().any(|r| r.tier == tier), "missing {tier}");
    }
}

#[test]
fn test_unrelated_query_returns_nothing() {
    let mut store = populated_store();
    assert!(store.recall("zebra", TierFilter::All).is_empty());
    assert!(store.recall("", TierFilter::All).is_empty());
}

#[test]
fn test_recall_marks_items_accessed() {
    let mut store = populated_store();
    store.recall("pasta", TierFilter::All);
    store.recall("pasta", TierFilter::All);

    let item = store.get("food").unwrap();
    assert_eq!(item.access_count, 2);
    assert_eq!(store.get("lang").unwrap().access_count, 0);
}

#[test]
fn test_repeated_recall_raises_importance_past_threshold() {
    let mut store = populated_store();
    let initial = store.get("food").unwrap().importance;

    // Consolidation threshold defaults to 5 accesses
    for _ in 0..5 {
        store.recall("pasta", TierFilter::All);
    }
    assert_eq!(store.get("food").unwrap().importance, initial);

    store.recall("pasta", TierFilter::All);
    let boosted = store.get("food").unwrap().importance;
    assert!(boosted > initial);
    assert_eq!(store.weight("food"), Some(boosted));
}
