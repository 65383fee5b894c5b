//! Facts, rules and forward chaining
//!
//! Rules pair placeholder templates with a conclusion template. The engine
//! matches text against them, substitutes captured variables, and chains
//! derived conclusions up to a fixed depth.

pub mod engine;
pub mod snapshot;
pub mod template;
pub mod types;

pub use engine::RuleEngine;
pub use snapshot::{RULE_SNAPSHOT_VERSION, RuleSnapshot};
pub use template::{Template, TemplateError, substitute};
pub use types::{Conclusion, Fact, Rule, RuleSpec};
