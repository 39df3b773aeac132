use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum VectorStoreError {
    #[error("dimension mismatch: index holds {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("upsert error: {0}")]
    Upsert(String),
    #[error("search error: {0}")]
    Search(String),
}

/// Distance function used for nearest-neighbor lookup. Smaller is closer for both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Euclidean distance.
    #[default]
    L2,
    /// `1 - cosine similarity`.
    Cosine,
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l2" | "euclidean" => Ok(Self::L2),
            "cosine" => Ok(Self::Cosine),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

/// A search hit: the insertion position of the stored vector and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

/// Positional nearest-neighbor search over fixed-length vectors.
///
/// Vectors are addressed by insertion position so callers can keep a parallel
/// array of documents aligned with the index.
pub trait SimilaritySearch: Send + Sync {
    /// Append a vector at position `len()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector is empty or its dimension differs from
    /// the vectors already stored.
    fn add(&mut self, vector: Vec<f32>) -> Result<(), VectorStoreError>;

    /// Up to `k` nearest stored vectors ordered by ascending distance.
    ///
    /// # Errors
    ///
    /// Returns an error if the query dimension differs from the stored vectors.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, VectorStoreError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_parses_case_insensitively() {
        assert_eq!("L2".parse::<Metric>().unwrap(), Metric::L2);
        assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert!("manhattan".parse::<Metric>().is_err());
    }

    #[test]
    fn metric_deserializes_lowercase() {
        let m: Metric = serde_json::from_str("\"cosine\"").unwrap();
        assert_eq!(m, Metric::Cosine);
    }
}
