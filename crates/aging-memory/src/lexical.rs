//! Term-overlap scoring over the document working set.
//!
//! Always available and always correct; used directly when no vector index
//! exists and as the fallback whenever the vector path fails.

use crate::document::{Document, ScoredDocument};

/// Lowercased whitespace-separated query terms with punctuation trimmed from their edges.
#[must_use]
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_owned())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Number of query terms occurring anywhere in `content` (case-insensitive substring match).
#[must_use]
pub fn overlap_count(content: &str, terms: &[String]) -> usize {
    let content = content.to_lowercase();
    terms.iter().filter(|t| content.contains(t.as_str())).count()
}

/// Rank documents by overlap count descending. Zero-score documents are
/// dropped and ties keep `documents` order.
#[must_use]
pub fn search(documents: &[Document], query: &str) -> Vec<ScoredDocument> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredDocument> = documents
        .iter()
        .filter_map(|doc| {
            let count = overlap_count(&doc.content, &terms);
            #[allow(clippy::cast_precision_loss)]
            let score = count as f64;
            (count > 0).then(|| ScoredDocument {
                document: doc.clone(),
                score,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored
}
