//! Text-processing collaborator
//!
//! The memory core never tokenizes on its own beyond plain whitespace
//! splitting; anything that needs tokens or a language tag goes through a
//! [`TextProcessor`]. The default [`WhitespaceProcessor`] is enough for
//! lexical overlap, and hosts can plug in a real tokenizer.

use serde::{Deserialize, Serialize};

/// Language tag reported by a [`TextProcessor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Vietnamese,
}

/// Trait for tokenization and language detection backends
pub trait TextProcessor: Send + Sync {
    /// Split text into an ordered list of normalized tokens
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Best-effort language tag for the text
    fn detect_language(&self, text: &str) -> Language;

    /// Processor name for logging
    fn name(&self) -> &'static str;
}

/// Lowercasing whitespace tokenizer with edge punctuation trimming
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceProcessor;

// Letters that only occur in Vietnamese orthography among the languages we care about.
const VIETNAMESE_MARKERS: &str = "ăâđêôơưạảấầẩẫậắằẳẵặẹẻẽếềểễệỉịọỏốồổỗộớờởỡợụủứừửữựỳỵỷỹ";

impl TextProcessor for WhitespaceProcessor {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation()).to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    fn detect_language(&self, text: &str) -> Language {
        let lower = text.to_lowercase();
        if lower.chars().any(|c| VIETNAMESE_MARKERS.contains(c)) {
            Language::Vietnamese
        } else {
            Language::English
        }
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}
