use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MnemoError, Result};

/// Version tag for the composite eviction ordering
pub const EVICTION_POLICY_VERSION: u32 = 1;

/// Main configuration structure for Mnemo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Memory tier configuration
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Inference and orchestration configuration
    #[serde(default)]
    pub reasoning: ReasoningConfig,
}

impl Config {
    /// Load configuration from an explicit path, or from the first default
    /// location that exists, falling back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        for path in default_config_paths() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(&path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MnemoError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| MnemoError::Config(format!("Failed to parse config: {e}")))
    }
}

fn default_config_paths() -> Vec<PathBuf> {
    [
        dirs::home_dir().map(|h| h.join(".mnemo").join("config.toml")),
        dirs::config_dir().map(|c| c.join("mnemo").join("config.toml")),
        Some(PathBuf::from("config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Memory tier capacities and lifecycle policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum items in the short-term ring buffer
    #[serde(default = "default_short_term_capacity")]
    pub short_term_capacity: usize,
    /// Maximum entries in long-term storage
    #[serde(default = "default_long_term_capacity")]
    pub long_term_capacity: usize,
    /// Maximum episodes in the episodic log
    #[serde(default = "default_episodic_capacity")]
    pub episodic_capacity: usize,
    /// Exponential decay rate per elapsed horizon
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
    /// Access count above which recall nudges importance up
    #[serde(default = "default_consolidation_threshold")]
    pub consolidation_threshold: u32,
    /// Importance above which an evicted short-term item is promoted
    #[serde(default = "default_promotion_threshold")]
    pub promotion_threshold: f64,
    /// Recall drops results scoring at or below this value
    #[serde(default = "default_relevance_floor")]
    pub relevance_floor: f64,
    /// Idle time before decay applies, in hours
    #[serde(default = "default_decay_horizon_hours")]
    pub decay_horizon_hours: u64,
    /// Composite eviction weights
    #[serde(default)]
    pub eviction: EvictionWeights,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_term_capacity: default_short_term_capacity(),
            long_term_capacity: default_long_term_capacity(),
            episodic_capacity: default_episodic_capacity(),
            decay_rate: default_decay_rate(),
            consolidation_threshold: default_consolidation_threshold(),
            promotion_threshold: default_promotion_threshold(),
            relevance_floor: default_relevance_floor(),
            decay_horizon_hours: default_decay_horizon_hours(),
            eviction: EvictionWeights::default(),
        }
    }
}

impl MemoryConfig {
    /// Convenience constructor for the three tier capacities
    pub fn with_capacities(short_term: usize, long_term: usize, episodic: usize) -> Self {
        Self {
            short_term_capacity: short_term,
            long_term_capacity: long_term,
            episodic_capacity: episodic,
            ..Self::default()
        }
    }
}

fn default_short_term_capacity() -> usize {
    10
}

fn default_long_term_capacity() -> usize {
    1000
}

fn default_episodic_capacity() -> usize {
    100
}

fn default_decay_rate() -> f64 {
    0.1
}

fn default_consolidation_threshold() -> u32 {
    5
}

fn default_promotion_threshold() -> f64 {
    0.7
}

fn default_relevance_floor() -> f64 {
    0.1
}

fn default_decay_horizon_hours() -> u64 {
    24
}

/// Weights for the long-term composite eviction key.
///
/// Recency is measured in milliseconds relative to the oldest entry, so the
/// default 0.001 weight is one point per second of recency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvictionWeights {
    #[serde(default = "default_importance_weight")]
    pub importance: f64,
    #[serde(default = "default_access_weight")]
    pub access: f64,
    #[serde(default = "default_recency_weight")]
    pub recency: f64,
}

impl Default for EvictionWeights {
    fn default() -> Self {
        Self {
            importance: default_importance_weight(),
            access: default_access_weight(),
            recency: default_recency_weight(),
        }
    }
}

fn default_importance_weight() -> f64 {
    1.0
}

fn default_access_weight() -> f64 {
    0.1
}

fn default_recency_weight() -> f64 {
    0.001
}

/// Forward chaining and orchestration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningConfig {
    /// Maximum forward-chaining depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Reasoning traces kept in memory
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Reasoning traces written to snapshots
    #[serde(default = "default_snapshot_history")]
    pub snapshot_history: usize,
    /// Minimum episodic relevance for an analogy candidate
    #[serde(default = "default_analogy_min_relevance")]
    pub analogy_min_relevance: f64,
    /// Discount applied to analogy confidence
    #[serde(default = "default_analogy_discount")]
    pub analogy_discount: f64,
    /// Episodic candidates considered for analogies
    #[serde(default = "default_analogy_candidates")]
    pub analogy_candidates: usize,
    /// Rule applications allowed per top-level chain
    #[serde(default = "default_max_rule_applications")]
    pub max_rule_applications: usize,
    /// Cached query conclusions kept
    #[serde(default = "default_inference_cache_capacity")]
    pub inference_cache_capacity: usize,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            history_capacity: default_history_capacity(),
            snapshot_history: default_snapshot_history(),
            analogy_min_relevance: default_analogy_min_relevance(),
            analogy_discount: default_analogy_discount(),
            analogy_candidates: default_analogy_candidates(),
            max_rule_applications: default_max_rule_applications(),
            inference_cache_capacity: default_inference_cache_capacity(),
        }
    }
}

fn default_max_depth() -> usize {
    3
}

fn default_history_capacity() -> usize {
    100
}

fn default_snapshot_history() -> usize {
    50
}

fn default_analogy_min_relevance() -> f64 {
    0.5
}

fn default_analogy_discount() -> f64 {
    0.7
}

fn default_analogy_candidates() -> usize {
    3
}

fn default_max_rule_applications() -> usize {
    256
}

fn default_inference_cache_capacity() -> usize {
    256
}
