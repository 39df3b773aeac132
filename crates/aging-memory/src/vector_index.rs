use std::time::Duration;

use aging_llm::EmbeddingProvider;

use crate::document::Document;
use crate::error::MemoryError;
use crate::in_memory_store::FlatIndex;
use crate::vector_store::{Neighbor, SimilaritySearch};

const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(30);

/// Embeddings of the document working set, positionally aligned with it.
///
/// The same embedder is used for building, adding and querying so that all
/// vectors live in one embedding space.
pub struct VectorIndex<E, S = FlatIndex> {
    embedder: E,
    search: S,
    timeout: Duration,
}

impl<E, S> std::fmt::Debug for VectorIndex<E, S>
where
    S: SimilaritySearch,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("len", &self.search.len())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<E: EmbeddingProvider, S: SimilaritySearch> VectorIndex<E, S> {
    /// Embed every document and load the vectors into `search`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::IndexUnavailable`] if the embedder has no
    /// embedding capability, or the first embedding or insertion error.
    pub async fn build(
        embedder: E,
        search: S,
        documents: &[Document],
        timeout: Duration,
    ) -> Result<Self, MemoryError> {
        if !embedder.supports_embeddings() {
            return Err(MemoryError::IndexUnavailable(format!(
                "provider {} does not support embeddings",
                embedder.name()
            )));
        }

        let mut index = Self {
            embedder,
            search,
            timeout,
        };
        for doc in documents {
            let vector = index.embed(&doc.content).await?;
            index.push(vector)?;
        }
        tracing::info!(vectors = index.len(), "built vector index");
        Ok(index)
    }

    /// Embed `text` with the index's embedder, bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding fails or times out.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        match tokio::time::timeout(self.timeout, self.embedder.embed(text)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(MemoryError::EmbeddingTimeout(self.timeout.as_secs())),
        }
    }

    /// Append a vector for the document at position `len()`.
    ///
    /// # Errors
    ///
    /// Returns an error if the similarity index rejects the vector.
    pub fn push(&mut self, vector: Vec<f32>) -> Result<(), MemoryError> {
        self.search.add(vector)?;
        Ok(())
    }

    /// Positions of the `k` nearest documents to `query`, ascending distance.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the query or the similarity search fails.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<Neighbor>, MemoryError> {
        let vector = self.embed(query).await?;
        Ok(self.search.search(&vector, k)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.search.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
    }
}

impl<E, S> VectorIndex<E, S> {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl<E: EmbeddingProvider> VectorIndex<E, FlatIndex> {
    /// Empty index over a [`FlatIndex`] with the default embedding timeout.
    #[must_use]
    pub fn empty(embedder: E, search: FlatIndex) -> Self {
        Self {
            embedder,
            search,
            timeout: DEFAULT_EMBED_TIMEOUT,
        }
    }
}
