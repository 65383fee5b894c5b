//! Versioned snapshot format for the rule engine

use serde::{Deserialize, Serialize};

use crate::reasoning::trace::ReasoningTrace;
use crate::rules::types::{Fact, Rule};

/// Current rule snapshot format version
pub const RULE_SNAPSHOT_VERSION: u32 = 1;

fn rule_snapshot_version() -> u32 {
    RULE_SNAPSHOT_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSnapshot {
    #[serde(default = "rule_snapshot_version")]
    pub version: u32,
    #[serde(default)]
    pub rules: Option<Vec<(String, Rule)>>,
    #[serde(default)]
    pub facts: Option<Vec<Fact>>,
    /// Cached query conclusions, least recently used first
    #[serde(default)]
    pub inferences: Option<Vec<(String, Vec<String>)>>,
    #[serde(default)]
    pub reasoning_history: Option<Vec<ReasoningTrace>>,
}

impl Default for RuleSnapshot {
    fn default() -> Self {
        Self {
            version: RULE_SNAPSHOT_VERSION,
            rules: None,
            facts: None,
            inferences: None,
            reasoning_history: None,
        }
    }
}
