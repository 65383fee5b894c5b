//! Canned question handlers
//!
//! Recognizes "what is X", "how to X", "why X" and "when X" questions
//! (plus their Vietnamese forms) and supplies a low-confidence templated
//! answer when memory has nothing better.

use serde::{Deserialize, Serialize};

use crate::rules::Template;
use crate::text::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    What,
    How,
    Why,
    When,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::What => "what",
            QuestionKind::How => "how",
            QuestionKind::Why => "why",
            QuestionKind::When => "when",
        }
    }

    /// Confidence of the templated fallback answer
    pub fn fallback_confidence(&self) -> f64 {
        match self {
            QuestionKind::What => 0.3,
            QuestionKind::How => 0.3,
            QuestionKind::Why => 0.2,
            QuestionKind::When => 0.4,
        }
    }

    pub fn fallback_answer(&self, subject: &str, language: Language) -> String {
        match (self, language) {
            (QuestionKind::What, Language::English) => {
                format!("{subject} is something I have no stored knowledge about yet.")
            }
            (QuestionKind::How, Language::English) => {
                format!("To {subject}, start by breaking the task into smaller steps.")
            }
            (QuestionKind::Why, Language::English) => {
                format!("There may be several reasons why {subject}.")
            }
            (QuestionKind::When, Language::English) => {
                format!("I have no record of when {subject}.")
            }
            (QuestionKind::What, Language::Vietnamese) => {
                format!("Tôi chưa có thông tin về {subject}.")
            }
            (QuestionKind::How, Language::Vietnamese) => {
                format!("Để {subject}, hãy chia nhỏ công việc thành từng bước.")
            }
            (QuestionKind::Why, Language::Vietnamese) => {
                format!("Có thể có nhiều lý do khiến {subject}.")
            }
            (QuestionKind::When, Language::Vietnamese) => {
                format!("Tôi không có ghi chép về thời điểm {subject}.")
            }
        }
    }
}

// Checked in order; the first match wins.
const QUESTION_PATTERNS: &[(QuestionKind, &str)] = &[
    (QuestionKind::What, "what is {X}"),
    (QuestionKind::What, "{X} là gì"),
    (QuestionKind::How, "how to {X}"),
    (QuestionKind::How, "làm thế nào để {X}"),
    (QuestionKind::Why, "why {X}"),
    (QuestionKind::Why, "tại sao {X}"),
    (QuestionKind::When, "when {X}"),
    (QuestionKind::When, "khi nào {X}"),
];

/// Classify a question and extract its subject
pub fn match_question(query: &str) -> Option<(QuestionKind, String)> {
    let query = query.trim().trim_end_matches('?').trim_end();

    QUESTION_PATTERNS.iter().find_map(|(kind, pattern)| {
        let template = Template::compile(pattern).ok()?;
        let captures = template.captures(query)?;
        let (_, subject) = captures.into_iter().next()?;
        Some((*kind, subject.trim().to_string()))
    })
}
