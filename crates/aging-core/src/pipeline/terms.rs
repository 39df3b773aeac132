use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "in", "on", "at", "to", "for", "with", "by", "is", "are", "was", "were",
    "be", "been", "being", "have", "has", "had", "do", "does", "did", "can", "could", "will",
    "would", "about",
];

/// Distinct lowercase word tokens longer than two characters, minus stopwords.
#[must_use]
pub fn extract_terms(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() > 2 && !STOPWORDS.contains(w))
        .map(str::to_owned)
        .collect()
}

/// `|query ∩ other| / (|query| + 1)`.
///
/// The `+1` keeps empty queries defined and caps every score below 1.0.
#[must_use]
pub fn overlap_score(query_terms: &BTreeSet<String>, other: &BTreeSet<String>) -> f64 {
    let shared = query_terms.intersection(other).count();
    #[allow(clippy::cast_precision_loss)]
    let score = shared as f64 / (query_terms.len() + 1) as f64;
    score
}

/// [`overlap_score`] against the terms of `text`.
#[must_use]
pub fn relevance(query_terms: &BTreeSet<String>, text: &str) -> f64 {
    overlap_score(query_terms, &extract_terms(text))
}

/// Whitespace word count, the unit generation budgets are expressed in.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| (*w).to_owned()).collect()
    }

    #[test]
    fn drops_stopwords_and_short_tokens() {
        let terms = extract_terms("What are the Hallmarks of aging? Is it DNA?");
        assert_eq!(terms, set(&["aging", "dna", "hallmarks", "what"]));
    }

    #[test]
    fn punctuation_separates_words() {
        let terms = extract_terms("mTOR-inhibition, (rapamycin)");
        assert_eq!(terms, set(&["inhibition", "mtor", "rapamycin"]));
    }

    #[test]
    fn perfect_match_stays_below_one() {
        let q = set(&["rapamycin", "lifespan"]);
        let score = overlap_score(&q, &q);
        assert!((score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_query_scores_zero() {
        assert!(relevance(&BTreeSet::new(), "anything at all").abs() < f64::EPSILON);
    }

    #[test]
    fn word_count_splits_on_whitespace() {
        assert_eq!(word_count("  one two\nthree\tfour "), 4);
        assert_eq!(word_count(""), 0);
    }
}
