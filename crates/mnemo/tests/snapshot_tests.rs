//! Integration tests for snapshot save and load
//!
//! Round-trips through JSON on disk, partial snapshots, capacity
//! re-enforcement on load, and history trimming.

use mnemo_core::config::{MemoryConfig, ReasoningConfig};
use mnemo_core::memory::{MemorySnapshot, Payload, Tier};
use mnemo_core::reasoning::Reasoner;
use mnemo_core::rules::{RuleEngine, RuleSnapshot};
use mnemo_core::snapshot::CortexSnapshot;
use mnemo_core::testing::{seeded_reasoner, store_with_capacities};
use mnemo_core::MemoryStore;
use tempfile::TempDir;

fn busy_reasoner() -> Reasoner {
    let mut reasoner = seeded_reasoner();
    let memory = reasoner.memory_mut();
    memory.add_to_short_term("planning the release");
    memory.add_to_long_term_with_importance("deadline", "release ships friday", 0.8);
    memory.add_to_long_term("owner", "alice owns the release");
    memory.add_episodic_memory("release retro went well");
    memory.recall("release", mnemo_core::memory::TierFilter::All);

    reasoner.rules_mut().add_fact("the release is on track", 0.7);
    reasoner.reason("if tests pass then ship");
    reasoner
}

#[test]
fn test_round_trip_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");

    let original = busy_reasoner();
    std::fs::write(&path, original.save().to_json().unwrap()).unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    let mut restored = Reasoner::default();
    restored.load(CortexSnapshot::from_json(&json).unwrap());

    assert_eq!(restored.memory().short_term(), original.memory().short_term());
    assert_eq!(restored.memory().long_term(), original.memory().long_term());
    assert_eq!(restored.memory().episodes(), original.memory().episodes());
    assert_eq!(restored.rules().facts(), original.rules().facts());
    assert_eq!(
        restored.rules().rules().collect::<Vec<_>>(),
        original.rules().rules().collect::<Vec<_>>()
    );
    assert_eq!(restored.history().count(), 1);
    let cached = restored.rules().cached_inference("if tests pass then ship");
    assert!(cached.is_some_and(|c| c.contains(&"ship".to_string())));
    assert_eq!(cached, original.rules().cached_inference("if tests pass then ship"));
}

#[test]
fn test_snapshot_field_names() {
    let snapshot = busy_reasoner().save();
    let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();

    for field in [
        "version",
        "shortTerm",
        "longTerm",
        "episodic",
        "memoryWeights",
        "accessCount",
        "lastAccess",
        "config",
        "timestamp",
    ] {
        assert!(value["memory"].get(field).is_some(), "missing memory.{field}");
    }
    for field in ["version", "rules", "facts", "inferences", "reasoningHistory"] {
        assert!(value["rules"].get(field).is_some(), "missing rules.{field}");
    }
    assert!(value["memory"]["config"].get("shortTermCapacity").is_some());
}

#[test]
fn test_partial_snapshot_keeps_existing_state() {
    let mut reasoner = busy_reasoner();
    let long_term_before = reasoner.memory().long_term().clone();
    let facts_before = reasoner.rules().facts().to_vec();

    let snapshot = CortexSnapshot {
        memory: MemorySnapshot {
            short_term: Some(vec![]),
            ..MemorySnapshot::default()
        },
        rules: RuleSnapshot::default(),
    };
    reasoner.load(snapshot);

    assert!(reasoner.memory().short_term().is_empty());
    assert_eq!(reasoner.memory().long_term(), &long_term_before);
    assert_eq!(reasoner.rules().facts(), facts_before.as_slice());
}

#[test]
fn test_mirror_maps_override_items() {
    let mut store = store_with_capacities(10, 10, 10);
    store.add_to_long_term_with_importance("k", "value", 0.5);

    let mut snapshot = store.save();
    snapshot.memory_weights = Some(vec![("k".to_string(), 0.9), ("ghost".to_string(), 0.1)]);
    snapshot.access_count = Some(vec![("k".to_string(), 7)]);

    let mut restored = MemoryStore::default();
    restored.load(snapshot);

    let item = restored.get("k").unwrap();
    assert_eq!(item.importance, 0.9);
    assert_eq!(item.access_count, 7);
    assert_eq!(restored.weight("k"), Some(0.9));
    assert!(restored.get("ghost").is_none());
}

#[test]
fn test_load_reenforces_capacity_without_promotion() {
    let mut big = MemoryStore::new(MemoryConfig::with_capacities(10, 10, 10));
    for i in 0..5 {
        big.add_to_short_term_with_importance(format!("item {i}"), 0.95);
    }
    let mut snapshot = big.save();
    snapshot.config = None;

    let mut small = store_with_capacities(2, 10, 10);
    small.load(snapshot);

    let contents: Vec<&Payload> = small.short_term().iter().map(|i| &i.content).collect();
    assert_eq!(contents, vec![&Payload::from("item 3"), &Payload::from("item 4")]);
    assert_eq!(small.len(Tier::LongTerm), 0);
}

#[test]
fn test_loaded_config_replaces_capacities() {
    let mut source = store_with_capacities(3, 4, 5);
    source.add_to_short_term("x");

    let mut target = MemoryStore::default();
    target.load(source.save());

    assert_eq!(target.config().short_term_capacity, 3);
    assert_eq!(target.config().long_term_capacity, 4);
    assert_eq!(target.config().episodic_capacity, 5);
}

#[test]
fn test_history_trimmed_on_save() {
    let config = ReasoningConfig {
        snapshot_history: 2,
        ..ReasoningConfig::default()
    };
    let mut engine = RuleEngine::new(config);
    for i in 0..4 {
        engine.record_trace(mnemo_core::ReasoningTrace::new(format!("q{i}")));
    }

    let snapshot = engine.save();
    let queries: Vec<String> = snapshot
        .reasoning_history
        .unwrap()
        .into_iter()
        .map(|t| t.query)
        .collect();
    assert_eq!(queries, vec!["q2", "q3"]);
}
