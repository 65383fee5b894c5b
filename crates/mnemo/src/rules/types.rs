//! Facts, rules and derived conclusions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::template::{Template, TemplateError, substitute};

/// Source recorded for facts asserted without an explicit origin
pub const DEFAULT_FACT_SOURCE: &str = "user";

/// An asserted fact.
///
/// Equality is structural over every field, timestamp included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub content: String,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl Fact {
    pub fn new(content: impl Into<String>, confidence: f64, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            confidence,
            timestamp: Utc::now(),
            source: source.into(),
        }
    }
}

/// What a caller supplies when registering a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: Vec<String>,
    pub conclusion: String,
    pub confidence: f64,
}

impl RuleSpec {
    pub fn new<I, S>(pattern: I, conclusion: impl Into<String>, confidence: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pattern: pattern.into_iter().map(Into::into).collect(),
            conclusion: conclusion.into(),
            confidence,
        }
    }
}

/// A named inference rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub name: String,
    pub pattern: Vec<String>,
    pub conclusion: String,
    pub confidence: f64,
    pub usage_count: u32,
    pub created_at: DateTime<Utc>,
}

/// A conclusion derived by applying a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conclusion {
    pub content: String,
    pub confidence: f64,
}

impl Rule {
    pub fn new(name: impl Into<String>, spec: RuleSpec) -> Self {
        Self {
            name: name.into(),
            pattern: spec.pattern,
            conclusion: spec.conclusion,
            confidence: spec.confidence,
            usage_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Cheap pre-filter: does any pattern loosely match the text?
    pub fn matches(&self, text: &str) -> Result<bool, TemplateError> {
        for pattern in &self.pattern {
            if Template::compile(pattern)?.loosely_matches(text) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Capture against the first pattern and fill in the conclusion.
    ///
    /// Returns `Ok(None)` when the text does not bind any variable.
    pub fn apply(&mut self, text: &str) -> Result<Option<Conclusion>, TemplateError> {
        let Some(first) = self.pattern.first() else {
            return Ok(None);
        };
        let vars = match Template::compile(first)?.captures(text) {
            Some(vars) if !vars.is_empty() => vars,
            _ => return Ok(None),
        };

        self.usage_count = self.usage_count.saturating_add(1);
        Ok(Some(Conclusion {
            content: substitute(&self.conclusion, &vars),
            confidence: self.confidence,
        }))
    }
}
