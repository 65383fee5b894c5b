//! Test utilities for mnemo - shared fixtures and mocks
//!
//! This module provides:
//! - A standard rule set (built once per test binary)
//! - Store, engine and reasoner builders with small capacities
//! - A mock text processor with a fixed language tag

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::config::{Config, MemoryConfig, ReasoningConfig};
use crate::memory::MemoryStore;
use crate::reasoning::Reasoner;
use crate::rules::{RuleEngine, RuleSpec};
use crate::text::{Language, TextProcessor, WhitespaceProcessor};

/// Rules used across reasoning tests.
///
/// `echo` is self-referential: it matches any text containing "echo" and
/// concludes more text containing "echo".
pub static STANDARD_RULES: LazyLock<Vec<(&'static str, RuleSpec)>> = LazyLock::new(|| {
    vec![
        (
            "modus_ponens",
            RuleSpec::new(["if {A} then {B}", "{A}"], "{B}", 0.9),
        ),
        (
            "wet_ground",
            RuleSpec::new(["the {X} is wet"], "the {X} is slippery", 0.8),
        ),
        ("echo", RuleSpec::new(["echo {X}"], "echo echo {X}", 0.5)),
    ]
});

/// Fixed reference instant for deterministic time-based tests
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// `epoch()` shifted by whole hours
pub fn hours_after_epoch(hours: i64) -> DateTime<Utc> {
    epoch() + Duration::hours(hours)
}

/// Store with the given capacities and default policy settings
pub fn store_with_capacities(short_term: usize, long_term: usize, episodic: usize) -> MemoryStore {
    MemoryStore::new(MemoryConfig::with_capacities(short_term, long_term, episodic))
}

/// Engine seeded with [`STANDARD_RULES`]
pub fn seeded_engine() -> RuleEngine {
    seeded_engine_with(ReasoningConfig::default())
}

pub fn seeded_engine_with(config: ReasoningConfig) -> RuleEngine {
    let mut engine = RuleEngine::new(config);
    for (name, spec) in STANDARD_RULES.iter() {
        engine.add_rule(*name, spec.clone());
    }
    engine
}

/// Reasoner with default config and [`STANDARD_RULES`] loaded
pub fn seeded_reasoner() -> Reasoner {
    let config = Config::default();
    Reasoner::new(
        MemoryStore::new(config.memory.clone()),
        seeded_engine_with(config.reasoning.clone()),
        config.reasoning,
    )
}

/// Text processor that tokenizes like [`WhitespaceProcessor`] but always
/// reports the same language.
#[derive(Debug, Clone, Copy)]
pub struct MockTextProcessor {
    pub language: Language,
}

impl MockTextProcessor {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn shared(language: Language) -> Arc<dyn TextProcessor> {
        Arc::new(Self::new(language))
    }
}

impl TextProcessor for MockTextProcessor {
    fn tokenize(&self, text: &str) -> Vec<String> {
        WhitespaceProcessor.tokenize(text)
    }

    fn detect_language(&self, _text: &str) -> Language {
        self.language
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
