use aging_memory::{Document, ScoredDocument};

use super::terms::{extract_terms, overlap_score};

const TERM_WEIGHT: f64 = 0.5;
const TITLE_WEIGHT: f64 = 0.3;
const CATEGORY_WEIGHT: f64 = 0.2;
const CATEGORY_MATCH: f64 = 0.5;

/// Categories that get a boost when the query uses one of their trigger keywords.
const CATEGORY_TRIGGERS: &[(&str, &[&str])] = &[
    ("hallmark", &["hallmark", "characteristic"]),
    (
        "aging_mechanisms",
        &["mechanism", "cause", "pathway", "molecular", "cellular"],
    ),
    (
        "interventions",
        &["intervention", "therapy", "treatment", "extend", "lifespan", "longevity"],
    ),
];

/// Re-scores retrieved documents by blending term overlap, title overlap and a
/// category boost.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reranker;

impl Reranker {
    /// Documents ordered by blended score, descending. Ties keep input order.
    #[must_use]
    pub fn rerank(&self, query: &str, documents: Vec<Document>) -> Vec<ScoredDocument> {
        let query_terms = extract_terms(query);
        let query_lower = query.to_lowercase();

        let mut scored: Vec<ScoredDocument> = documents
            .into_iter()
            .map(|document| {
                let term_score = overlap_score(&query_terms, &extract_terms(&document.content));
                let title_score = document
                    .metadata
                    .title
                    .as_deref()
                    .map_or(0.0, |title| overlap_score(&query_terms, &extract_terms(title)));
                let category_score =
                    category_score(document.metadata.category.as_deref(), &query_lower);

                ScoredDocument {
                    score: TERM_WEIGHT * term_score
                        + TITLE_WEIGHT * title_score
                        + CATEGORY_WEIGHT * category_score,
                    document,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored
    }
}

fn category_score(category: Option<&str>, query_lower: &str) -> f64 {
    let Some(category) = category else {
        return 0.0;
    };
    CATEGORY_TRIGGERS
        .iter()
        .find(|(name, _)| *name == category)
        .filter(|(_, keywords)| keywords.iter().any(|k| query_lower.contains(k)))
        .map_or(0.0, |_| CATEGORY_MATCH)
}
