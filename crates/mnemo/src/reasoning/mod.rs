//! Query reasoning
//!
//! Combines facts, memory recall, forward chaining, canned question
//! handlers and episodic analogies into a single [`ReasoningTrace`].

pub mod analogy;
pub mod handlers;
pub mod orchestrator;
pub mod trace;

pub use handlers::{QuestionKind, match_question};
pub use orchestrator::{Reasoner, SharedReasoner};
pub use trace::{ReasoningStep, ReasoningTrace, StepKind};
