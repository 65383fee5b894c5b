//! Versioned snapshot format for the memory tiers
//!
//! Every field except `version` is optional so that partial snapshots load
//! cleanly: whatever is missing keeps its pre-load value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::MemoryConfig;
use crate::memory::types::{Episode, MemoryItem};

/// Current memory snapshot format version
pub const MEMORY_SNAPSHOT_VERSION: u32 = 1;

fn memory_snapshot_version() -> u32 {
    MEMORY_SNAPSHOT_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySnapshot {
    #[serde(default = "memory_snapshot_version")]
    pub version: u32,
    #[serde(default)]
    pub short_term: Option<Vec<MemoryItem>>,
    #[serde(default)]
    pub long_term: Option<Vec<(String, MemoryItem)>>,
    #[serde(default)]
    pub episodic: Option<Vec<Episode>>,
    #[serde(default)]
    pub memory_weights: Option<Vec<(String, f64)>>,
    #[serde(default)]
    pub access_count: Option<Vec<(String, u32)>>,
    #[serde(default)]
    pub last_access: Option<Vec<(String, DateTime<Utc>)>>,
    #[serde(default)]
    pub config: Option<ConfigSnapshot>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for MemorySnapshot {
    fn default() -> Self {
        Self {
            version: MEMORY_SNAPSHOT_VERSION,
            short_term: None,
            long_term: None,
            episodic: None,
            memory_weights: None,
            access_count: None,
            last_access: None,
            config: None,
            timestamp: None,
        }
    }
}

/// Persisted subset of [`MemoryConfig`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub short_term_capacity: Option<usize>,
    #[serde(default)]
    pub long_term_capacity: Option<usize>,
    #[serde(default)]
    pub episodic_capacity: Option<usize>,
    #[serde(default)]
    pub decay_rate: Option<f64>,
    #[serde(default)]
    pub consolidation_threshold: Option<u32>,
}

impl ConfigSnapshot {
    pub fn capture(config: &MemoryConfig) -> Self {
        Self {
            short_term_capacity: Some(config.short_term_capacity),
            long_term_capacity: Some(config.long_term_capacity),
            episodic_capacity: Some(config.episodic_capacity),
            decay_rate: Some(config.decay_rate),
            consolidation_threshold: Some(config.consolidation_threshold),
        }
    }

    /// Overwrite only the fields present in the snapshot
    pub fn apply_to(&self, config: &mut MemoryConfig) {
        if let Some(v) = self.short_term_capacity {
            config.short_term_capacity = v;
        }
        if let Some(v) = self.long_term_capacity {
            config.long_term_capacity = v;
        }
        if let Some(v) = self.episodic_capacity {
            config.episodic_capacity = v;
        }
        if let Some(v) = self.decay_rate {
            config.decay_rate = v;
        }
        if let Some(v) = self.consolidation_threshold {
            config.consolidation_threshold = v;
        }
    }
}
