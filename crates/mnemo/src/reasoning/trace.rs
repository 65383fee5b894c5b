//! Reasoning traces
//!
//! A trace records every contributing step for one query. Confidence is
//! merged by maximum: adding a step can raise the trace's confidence but
//! never lowers it, and never sums evidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a reasoning step came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Fact,
    Memory,
    Rule,
    Pattern,
    Analogy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub kind: StepKind,
    /// Rule name, handler name, memory tier or fact source
    pub source: String,
    pub content: String,
    pub confidence: f64,
    /// Forward-chaining depth, for rule steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
}

impl ReasoningStep {
    pub fn new(
        kind: StepKind,
        source: impl Into<String>,
        content: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
            content: content.into(),
            confidence,
            depth: None,
        }
    }

    pub fn at_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningTrace {
    pub query: String,
    pub steps: Vec<ReasoningStep>,
    /// Distinct conclusions in the order they were reached
    pub conclusions: Vec<String>,
    pub confidence: f64,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl ReasoningTrace {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            steps: Vec::new(),
            conclusions: Vec::new(),
            confidence: 0.0,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    pub fn has_conclusion(&self, content: &str) -> bool {
        self.conclusions.iter().any(|c| c == content)
    }

    /// Record a step and merge its conclusion.
    ///
    /// Returns true if the conclusion was new.
    pub fn add_conclusion(&mut self, step: ReasoningStep) -> bool {
        let is_new = !self.has_conclusion(&step.content);
        if is_new {
            self.conclusions.push(step.content.clone());
        }
        self.confidence = self.confidence.max(step.confidence);
        self.steps.push(step);
        is_new
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    /// Conclusion of the highest-confidence step
    pub fn best_conclusion(&self) -> Option<&str> {
        self.steps
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .map(|s| s.content.as_str())
    }

    /// Deepest forward-chaining level that produced a step
    pub fn max_rule_depth(&self) -> Option<usize> {
        self.steps.iter().filter_map(|s| s.depth).max()
    }

    pub fn steps_of(&self, kind: StepKind) -> impl Iterator<Item = &ReasoningStep> {
        self.steps.iter().filter(move |s| s.kind == kind)
    }
}
