//! Mnemo - tiered agent memory with bounded rule-based reasoning
//!
//! This crate keeps short-term, long-term and episodic memories under fixed
//! capacities, promotes and decays them by importance, and answers queries
//! by combining facts, recall, forward-chained rules and analogies into a
//! ranked reasoning trace.

pub mod config;
pub mod error;
pub mod memory;
pub mod reasoning;
pub mod rules;
pub mod snapshot;
pub mod testing;
pub mod text;

pub use config::Config;
pub use error::{MnemoError, Result};
pub use memory::MemoryStore;
pub use reasoning::{Reasoner, ReasoningTrace, SharedReasoner};
pub use rules::RuleEngine;
pub use snapshot::CortexSnapshot;
pub use text::{Language, TextProcessor, WhitespaceProcessor};
