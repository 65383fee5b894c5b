//! Memory types for the Mnemo system
//!
//! Defines the items held by each tier, the episodic record format, and
//! the shape of recall results.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque memory payload: free text or a structured event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Structured(serde_json::Value),
}

impl Payload {
    /// Text view of the payload, `None` for structured content
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(s) => Some(s),
            Payload::Structured(serde_json::Value::String(s)) => Some(s),
            Payload::Structured(_) => None,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(s) => f.write_str(s),
            Payload::Structured(v) => write!(f, "{v}"),
        }
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<serde_json::Value> for Payload {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => Payload::Text(s),
            other => Payload::Structured(other),
        }
    }
}

/// A single remembered item, owned by exactly one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryItem {
    pub id: Uuid,
    pub content: Payload,
    /// Importance in [0, 1]
    pub importance: f64,
    pub created_at: DateTime<Utc>,
    pub access_count: u32,
    pub last_access: DateTime<Utc>,
    /// Set on items promoted out of short-term; shields them from decay purges
    pub consolidated: bool,
}

impl MemoryItem {
    pub fn new(content: Payload, importance: f64) -> Self {
        Self::new_at(content, importance, Utc::now())
    }

    pub fn new_at(content: Payload, importance: f64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            importance: importance.clamp(0.0, 1.0),
            created_at: now,
            access_count: 0,
            last_access: now,
            consolidated: false,
        }
    }

    /// Copy of this item for another tier: fresh id, consolidated, same history
    pub fn promoted(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            consolidated: true,
            ..self.clone()
        }
    }

    /// Mark this item as accessed, updating access count and timestamp
    pub fn mark_accessed(&mut self, now: DateTime<Utc>) {
        self.access_count = self.access_count.saturating_add(1);
        self.last_access = now;
    }

    pub fn set_importance(&mut self, importance: f64) {
        self.importance = importance.clamp(0.0, 1.0);
    }
}

/// Snapshot of what was on the agent's mind when an episode was recorded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeContext {
    /// Up to three most recent short-term contents, newest last
    pub recent: Vec<Payload>,
    pub active_topics: Vec<String>,
}

/// An entry in the episodic log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: Uuid,
    pub event: Payload,
    pub timestamp: DateTime<Utc>,
    pub context: EpisodeContext,
    /// emotion name -> 0 | 1
    pub emotional_tags: BTreeMap<String, u8>,
    pub importance: f64,
}

/// Memory tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    ShortTerm,
    LongTerm,
    Episodic,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::ShortTerm => "short_term",
            Tier::LongTerm => "long_term",
            Tier::Episodic => "episodic",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tiers a recall searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierFilter {
    #[default]
    All,
    Only(Tier),
}

impl TierFilter {
    pub fn includes(&self, tier: Tier) -> bool {
        match self {
            TierFilter::All => true,
            TierFilter::Only(t) => *t == tier,
        }
    }
}

impl From<Tier> for TierFilter {
    fn from(tier: Tier) -> Self {
        TierFilter::Only(tier)
    }
}

impl FromStr for TierFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "all" => Ok(TierFilter::All),
            "short_term" | "short" => Ok(TierFilter::Only(Tier::ShortTerm)),
            "long_term" | "long" => Ok(TierFilter::Only(Tier::LongTerm)),
            "episodic" => Ok(TierFilter::Only(Tier::Episodic)),
            other => Err(format!(
                "Unknown tier: {other}. Use all, short_term, long_term, or episodic."
            )),
        }
    }
}

/// A recalled memory with its relevance score
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallResult {
    pub tier: Tier,
    /// Long-term key, if the hit came from long-term storage
    pub key: Option<String>,
    pub id: Uuid,
    pub content: Payload,
    pub relevance: f64,
    pub importance: f64,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a decay pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecayReport {
    pub decayed: usize,
    pub purged: Vec<String>,
}

/// Point-in-time counts for the three tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub short_term: usize,
    pub short_term_capacity: usize,
    pub long_term: usize,
    pub long_term_capacity: usize,
    pub episodic: usize,
    pub episodic_capacity: usize,
    pub consolidated: usize,
    pub mean_long_term_importance: f64,
}
