//! Token-overlap analogies between a query and episodic memories

use std::collections::BTreeSet;

use crate::text::TextProcessor;

/// Tokens shorter than this carry too little signal to count as shared
const MIN_TOKEN_CHARS: usize = 4;

/// Distinct tokens of at least [`MIN_TOKEN_CHARS`] characters
pub fn significant_tokens(text: &str, processor: &dyn TextProcessor) -> BTreeSet<String> {
    processor
        .tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .collect()
}

/// Confidence that `candidate` is analogous to `query`.
///
/// `shared / max(|Q|, |C|) * discount`, or `None` when nothing is shared.
pub fn analogy_confidence(
    query: &str,
    candidate: &str,
    processor: &dyn TextProcessor,
    discount: f64,
) -> Option<f64> {
    let q = significant_tokens(query, processor);
    let c = significant_tokens(candidate, processor);

    let shared = q.intersection(&c).count();
    if shared == 0 {
        return None;
    }

    Some(shared as f64 / q.len().max(c.len()) as f64 * discount)
}
