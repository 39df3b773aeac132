use crate::vector_store::{Metric, Neighbor, SimilaritySearch, VectorStoreError};

/// Exhaustive in-memory index. Every search scans all stored vectors.
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    metric: Metric,
    dimension: Option<usize>,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    #[must_use]
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            dimension: None,
            vectors: Vec::new(),
        }
    }

    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.metric {
            Metric::L2 => l2_distance(a, b),
            Metric::Cosine => 1.0 - cosine_similarity(a, b),
        }
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

impl SimilaritySearch for FlatIndex {
    fn add(&mut self, vector: Vec<f32>) -> Result<(), VectorStoreError> {
        if vector.is_empty() {
            return Err(VectorStoreError::Upsert("empty vector".into()));
        }
        match self.dimension {
            Some(expected) if expected != vector.len() => {
                return Err(VectorStoreError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
            Some(_) => {}
            None => self.dimension = Some(vector.len()),
        }
        self.vectors.push(vector);
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, VectorStoreError> {
        let Some(expected) = self.dimension else {
            return Ok(Vec::new());
        };
        if query.len() != expected {
            return Err(VectorStoreError::DimensionMismatch {
                expected,
                actual: query.len(),
            });
        }

        let mut scored: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| Neighbor {
                position,
                distance: self.distance(query, v),
            })
            .collect();

        if scored.iter().any(|n| n.distance.is_nan()) {
            return Err(VectorStoreError::Search("distance is NaN".into()));
        }

        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(metric: Metric, vectors: &[&[f32]]) -> FlatIndex {
        let mut index = FlatIndex::new(metric);
        for v in vectors {
            index.add(v.to_vec()).unwrap();
        }
        index
    }

    #[test]
    fn l2_orders_by_ascending_distance() {
        let index = index_with(Metric::L2, &[&[0.0, 0.0], &[5.0, 5.0], &[1.0, 0.0]]);
        let hits = index.search(&[0.9, 0.0], 3).unwrap();
        let positions: Vec<usize> = hits.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![2, 0, 1]);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn cosine_ignores_magnitude() {
        let index = index_with(Metric::Cosine, &[&[10.0, 0.0], &[0.0, 1.0]]);
        let hits = index.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(hits[0].position, 0);
        assert!(hits[0].distance.abs() < 1e-6);
    }

    #[test]
    fn truncates_to_k() {
        let index = index_with(Metric::L2, &[&[0.0], &[1.0], &[2.0]]);
        assert_eq!(index.search(&[0.0], 2).unwrap().len(), 2);
        assert!(index.search(&[0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let index = index_with(Metric::L2, &[&[1.0], &[-1.0], &[1.0]]);
        let hits = index.search(&[0.0], 3).unwrap();
        let positions: Vec<usize> = hits.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn dimension_mismatch_on_add_and_search() {
        let mut index = index_with(Metric::L2, &[&[1.0, 2.0]]);
        assert!(matches!(
            index.add(vec![1.0]),
            Err(VectorStoreError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(index.search(&[1.0, 2.0, 3.0], 1).is_err());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn empty_vector_rejected() {
        let mut index = FlatIndex::new(Metric::L2);
        assert!(matches!(index.add(Vec::new()), Err(VectorStoreError::Upsert(_))));
        assert!(index.is_empty());
    }

    #[test]
    fn search_on_empty_index() {
        let index = FlatIndex::new(Metric::Cosine);
        assert!(index.search(&[1.0], 3).unwrap().is_empty());
        assert_eq!(index.dimension(), None);
    }

    #[test]
    fn cosine_zero_vector_is_orthogonal() {
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).abs() < f32::EPSILON);
    }
}
