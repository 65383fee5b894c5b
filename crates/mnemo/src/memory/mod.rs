//! Memory types and operations
//!
//! Defines the three memory tiers (short-term, long-term, episodic), the
//! policies that move items between them, and lexical recall.

pub mod eviction;
pub mod importance;
pub mod relevance;
pub mod snapshot;
pub mod store;
pub mod types;

pub use eviction::{composite_score, eviction_candidates};
pub use importance::calculate_importance;
pub use snapshot::{ConfigSnapshot, MEMORY_SNAPSHOT_VERSION, MemorySnapshot};
pub use store::MemoryStore;
pub use types::{
    DecayReport, Episode, EpisodeContext, MemoryItem, MemoryStats, Payload, RecallResult, Tier,
    TierFilter,
};
