//! Combined memory + rule snapshot
//!
//! This is the document the CLI persists between invocations. Either half
//! may be missing, in which case loading it leaves that side untouched.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memory::MemorySnapshot;
use crate::rules::RuleSnapshot;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CortexSnapshot {
    #[serde(default)]
    pub memory: MemorySnapshot,
    #[serde(default)]
    pub rules: RuleSnapshot,
}

impl CortexSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
