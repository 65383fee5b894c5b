//! Lexical relevance scoring
//!
//! Token-overlap similarity between a query and stored content. Matching is
//! purely lexical: "ai" matches "ai" and "maintain".

use crate::memory::types::Payload;

/// Boost applied when the whole query appears verbatim in the content
pub const SUBSTRING_BOOST: f64 = 0.5;

/// Score `content` against `query`, in [0, 1].
///
/// Each query token counts as a match when some content token contains it
/// or is contained by it. The score is the fraction of matching query
/// tokens, boosted by [`SUBSTRING_BOOST`] when the full query occurs inside
/// the content.
pub fn score(query: &str, content: &str) -> f64 {
    let query_lower = query.to_lowercase();
    let content_lower = content.to_lowercase();

    let query_tokens: Vec<&str> = query_lower.split_whitespace().collect();
    if query_tokens.is_empty() {
        return 0.0;
    }
    let content_tokens: Vec<&str> = content_lower.split_whitespace().collect();

    let matches = query_tokens
        .iter()
        .filter(|q| {
            content_tokens
                .iter()
                .any(|c| c.contains(*q) || q.contains(*c))
        })
        .count();

    let mut similarity = matches as f64 / query_tokens.len() as f64;
    if content_lower.contains(query_lower.trim()) {
        similarity = (similarity + SUBSTRING_BOOST).min(1.0);
    }
    similarity
}

/// Score a payload; structured payloads are not textual and score 0
pub fn score_payload(query: &str, content: &Payload) -> f64 {
    content.as_text().map_or(0.0, |text| score(query, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_token_scores_nonzero() {
        let s = score("AI machine learning", "AI là trí tuệ nhân tạo");
        assert!((s - 1.0 / 3.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn test_substring_in_either_direction() {
        // "learn" is inside "learning"; "learning" contains query token "learn"
        assert_eq!(score("learn", "deep learning"), 1.0);
        // content token "cat" is inside query token "cats"
        assert!(score("cats dogs", "a cat") >= 0.5);
    }

    #[test]
    fn test_full_query_substring_boost() {
        let plain = score("rust borrow", "borrow rust");
        let boosted = score("rust borrow", "the rust borrow checker");
        assert_eq!(plain, 1.0);
        assert_eq!(boosted, 1.0);

        let partial = score("rust zebra", "rust zebra crossing");
        assert_eq!(partial, 1.0);
        let no_boost = score("rust zebra", "zebra and rust");
        assert_eq!(no_boost, 1.0);
        let half = score("rust giraffe", "the rust book");
        assert!((half - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_boost_is_capped() {
        assert_eq!(score("hello", "hello world"), 1.0);
    }

    #[test]
    fn test_empty_query_scores_zero() {
        assert_eq!(score("", "anything"), 0.0);
        assert_eq!(score("   ", "anything"), 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(score("RUST", "i like rust"), 1.0);
    }

    #[test]
    fn test_structured_payload_scores_zero() {
        let payload = Payload::from(serde_json::json!({"event": "rust"}));
        assert_eq!(score_payload("rust", &payload), 0.0);
        assert_eq!(score_payload("rust", &Payload::from("rust")), 1.0);
    }

    #[test]
    fn test_unrelated_scores_zero() {
        assert_eq!(score("quantum", "baking bread"), 0.0);
    }
}
