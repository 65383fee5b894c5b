//! Importance heuristics for incoming memories
//!
//! This module computes the initial importance of a memory from its text,
//! and derives the emotional tags and active topics attached to episodes.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::memory::types::Payload;
use crate::text::TextProcessor;

/// Importance assigned when content gives no signal (or is not text)
pub const BASE_IMPORTANCE: f64 = 0.5;

const KEYWORD_BONUS: f64 = 0.3;
const LENGTH_BONUS: f64 = 0.1;
const EMOTION_BONUS: f64 = 0.2;
const LONG_CONTENT_CHARS: usize = 100;

/// Words that flag content as worth keeping
pub const IMPORTANCE_KEYWORDS: &[&str] = &[
    "important",
    "remember",
    "critical",
    "urgent",
    "essential",
    "never forget",
    "deadline",
    "quan trọng",
    "ghi nhớ",
    "khẩn cấp",
    "cần thiết",
];

/// Words signalling a strong emotional charge
pub const STRONG_EMOTION_KEYWORDS: &[&str] = &[
    "love",
    "hate",
    "amazing",
    "terrible",
    "wonderful",
    "awful",
    "furious",
    "terrified",
    "devastated",
    "thrilled",
    "yêu",
    "ghét",
    "tuyệt vời",
    "kinh khủng",
];

/// Emotion families used to tag episodes
const EMOTION_FAMILIES: &[(&str, &[&str])] = &[
    ("joy", &["happy", "glad", "joy", "love", "great", "thrilled", "vui", "hạnh phúc"]),
    ("sadness", &["sad", "unhappy", "cry", "lonely", "devastated", "buồn"]),
    ("anger", &["angry", "furious", "hate", "annoyed", "mad", "giận", "ghét"]),
    ("fear", &["afraid", "scared", "terrified", "worried", "anxious", "sợ", "lo lắng"]),
    ("surprise", &["surprised", "amazing", "wow", "unexpected", "shocked", "bất ngờ"]),
];

const MAX_ACTIVE_TOPICS: usize = 3;
const MIN_TOPIC_CHARS: usize = 4;

/// Compute the importance of new content.
///
/// Starts at [`BASE_IMPORTANCE`] and adds a bonus for importance keywords,
/// for long content, and for strong emotion, clamped to 1.0.
pub fn calculate_importance(content: &Payload) -> f64 {
    let Some(text) = content.as_text() else {
        return BASE_IMPORTANCE;
    };

    let lower = text.to_lowercase();
    let mut importance = BASE_IMPORTANCE;

    if contains_any(&lower, IMPORTANCE_KEYWORDS) {
        importance += KEYWORD_BONUS;
    }
    if text.chars().count() > LONG_CONTENT_CHARS {
        importance += LENGTH_BONUS;
    }
    if contains_any(&lower, STRONG_EMOTION_KEYWORDS) {
        importance += EMOTION_BONUS;
    }

    importance.min(1.0)
}

/// Tag each emotion family with 1 if any of its words occur, else 0.
///
/// Single words must equal a token; multi-word phrases match as substrings.
pub fn emotional_tags(content: &Payload, processor: &dyn TextProcessor) -> BTreeMap<String, u8> {
    let lower = content.as_text().map(str::to_lowercase).unwrap_or_default();
    let tokens: HashSet<String> = processor.tokenize(&lower).into_iter().collect();
    let occurs = |word: &&str| {
        if word.contains(char::is_whitespace) {
            lower.contains(*word)
        } else {
            tokens.contains(*word)
        }
    };

    EMOTION_FAMILIES
        .iter()
        .map(|(name, words)| (name.to_string(), u8::from(words.iter().any(occurs))))
        .collect()
}

/// Most frequent substantial tokens across the given contents.
///
/// Ties are broken by first appearance so the result is stable.
pub fn active_topics(contents: &[&Payload], processor: &dyn TextProcessor) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut order = 0;
    for text in contents.iter().filter_map(|c| c.as_text()) {
        for token in processor.tokenize(text) {
            if token.chars().count() < MIN_TOPIC_CHARS {
                continue;
            }
            let entry = counts.entry(token).or_insert((0, order));
            entry.0 += 1;
            order += 1;
        }
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));
    ranked
        .into_iter()
        .take(MAX_ACTIVE_TOPICS)
        .map(|(token, _)| token)
        .collect()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::WhitespaceProcessor;

    #[test]
    fn test_plain_content_gets_base() {
        assert_eq!(calculate_importance(&"the cat sat".into()), BASE_IMPORTANCE);
    }

    #[test]
    fn test_keyword_bonus() {
        let importance = calculate_importance(&"Remember to call mom".into());
        assert!((importance - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_length_bonus() {
        let long = "x".repeat(101);
        assert!((calculate_importance(&long.as_str().into()) - 0.6).abs() < 1e-9);
        let boundary = "x".repeat(100);
        assert_eq!(calculate_importance(&boundary.as_str().into()), BASE_IMPORTANCE);
    }

    #[test]
    fn test_emotion_bonus_and_clamp() {
        let emotional = calculate_importance(&"I love this".into());
        assert!((emotional - 0.7).abs() < 1e-9);

        let everything = format!("important: I love it {}", "y".repeat(120));
        assert_eq!(calculate_importance(&everything.as_str().into()), 1.0);
    }

    #[test]
    fn test_vietnamese_keyword() {
        let importance = calculate_importance(&"Điều này rất quan trọng".into());
        assert!((importance - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_structured_content_defaults() {
        let payload = Payload::from(serde_json::json!({"note": "important"}));
        assert_eq!(calculate_importance(&payload), BASE_IMPORTANCE);
        assert!(emotional_tags(&payload, &WhitespaceProcessor).values().all(|v| *v == 0));
    }

    #[test]
    fn test_emotional_tags() {
        let tags = emotional_tags(&"I was so scared, then happy".into(), &WhitespaceProcessor);
        assert_eq!(tags["fear"], 1);
        assert_eq!(tags["joy"], 1);
        assert_eq!(tags["anger"], 0);
        assert_eq!(tags.len(), 5);
    }

    #[test]
    fn test_emotion_words_need_whole_tokens() {
        let tags = emotional_tags(&"We made a crystal glove".into(), &WhitespaceProcessor);
        assert!(tags.values().all(|v| *v == 0));

        let tags = emotional_tags(&"Mad, crying? No: I cry. Love!".into(), &WhitespaceProcessor);
        assert_eq!(tags["anger"], 1);
        assert_eq!(tags["sadness"], 1);
        assert_eq!(tags["joy"], 1);
    }

    #[test]
    fn test_vietnamese_phrases_match_as_substrings() {
        let tags = emotional_tags(&"Tôi rất lo lắng và hạnh phúc".into(), &WhitespaceProcessor);
        assert_eq!(tags["fear"], 1);
        assert_eq!(tags["joy"], 1);
        assert_eq!(tags["anger"], 0);
    }

    #[test]
    fn test_active_topics_ranked_by_frequency() {
        let a: Payload = "rust compiler errors".into();
        let b: Payload = "the rust borrow checker".into();
        let c: Payload = "compiler rust".into();
        let topics = active_topics(&[&a, &b, &c], &WhitespaceProcessor);
        assert_eq!(topics, vec!["rust", "compiler", "errors"]);
    }
}
