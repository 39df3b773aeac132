use aging_llm::EmbeddingProvider;
use tokio::sync::RwLock;

use crate::document::{Document, DocumentMetadata};
use crate::error::MemoryError;
use crate::lexical;
use crate::store::DocumentStore;
use crate::vector_index::VectorIndex;

struct KnowledgeState<E> {
    store: DocumentStore,
    index: Option<VectorIndex<E>>,
}

impl<E: EmbeddingProvider> KnowledgeState<E> {
    /// The index is only usable while it holds exactly one vector per document.
    fn aligned_index(&self) -> Option<&VectorIndex<E>> {
        self.index
            .as_ref()
            .filter(|index| index.len() == self.store.len())
    }
}

/// Single retrieval entry point over a [`DocumentStore`] and an optional [`VectorIndex`].
///
/// Queries share a read lock; additions take the write lock so the store and
/// index grow together.
pub struct Retriever<E> {
    state: RwLock<KnowledgeState<E>>,
}

impl<E> std::fmt::Debug for Retriever<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever").finish_non_exhaustive()
    }
}

impl<E: EmbeddingProvider> Retriever<E> {
    /// Lexical-only retriever.
    #[must_use]
    pub fn lexical(store: DocumentStore) -> Self {
        Self::new(store, None)
    }

    #[must_use]
    pub fn new(store: DocumentStore, index: Option<VectorIndex<E>>) -> Self {
        if let Some(index) = &index
            && index.len() != store.len()
        {
            tracing::warn!(
                vectors = index.len(),
                documents = store.len(),
                "vector index is not aligned with the store, using lexical search"
            );
        }
        Self {
            state: RwLock::new(KnowledgeState { store, index }),
        }
    }

    /// Up to `k` documents, most relevant first.
    ///
    /// Uses the vector index when one is aligned with the store; any failure on
    /// that path falls back to lexical search for this call only.
    pub async fn retrieve(&self, query: &str, k: usize) -> Vec<Document> {
        let state = self.state.read().await;
        if k == 0 || state.store.is_empty() {
            return Vec::new();
        }

        if let Some(index) = state.aligned_index() {
            match vector_retrieve(index, state.store.all(), query, k).await {
                Ok(documents) => return documents,
                Err(e) => tracing::warn!("vector search failed, falling back to lexical: {e}"),
            }
        } else if state.index.is_some() {
            tracing::warn!("vector index is stale, using lexical search");
        }

        lexical::search(state.store.all(), query)
            .into_iter()
            .take(k)
            .map(|s| s.document)
            .collect()
    }

    /// Write `content` through to the store and, when an index exists, append
    /// its embedding.
    ///
    /// An embedding failure leaves the document lexically searchable and marks
    /// the index stale.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store rejects the document.
    pub async fn add_document(
        &self,
        content: impl Into<String>,
        metadata: DocumentMetadata,
        id: Option<String>,
    ) -> Result<Document, MemoryError> {
        let content = content.into();

        let embedding = {
            let state = self.state.read().await;
            match &state.index {
                Some(index) => Some(index.embed(&content).await),
                None => None,
            }
        };

        let mut state = self.state.write().await;
        let aligned_before = state.aligned_index().is_some();
        let document = state.store.add(content, metadata, id).await?;

        if let (Some(embedding), Some(index)) = (embedding, state.index.as_mut()) {
            let pushed = match embedding {
                Ok(vector) if aligned_before => index.push(vector),
                Ok(_) => Err(MemoryError::IndexUnavailable("index already stale".into())),
                Err(e) => Err(e),
            };
            if let Err(e) = pushed {
                tracing::warn!(id = %document.id, "failed to index document, vector search disabled: {e}");
            }
        }

        Ok(document)
    }

    /// Snapshot of all documents in insertion order.
    pub async fn documents(&self) -> Vec<Document> {
        self.state.read().await.store.all().to_vec()
    }

    pub async fn get(&self, id: &str) -> Option<Document> {
        self.state.read().await.store.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.store.is_empty()
    }

    /// Whether queries currently go through the vector index.
    pub async fn uses_vector_search(&self) -> bool {
        self.state.read().await.aligned_index().is_some()
    }
}

async fn vector_retrieve<E: EmbeddingProvider>(
    index: &VectorIndex<E>,
    documents: &[Document],
    query: &str,
    k: usize,
) -> Result<Vec<Document>, MemoryError> {
    let neighbors = index.search(query, k).await?;
    neighbors
        .into_iter()
        .map(|n| {
            documents.get(n.position).cloned().ok_or_else(|| {
                MemoryError::IndexUnavailable(format!("no document at position {}", n.position))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use aging_llm::mock::MockProvider;

    use super::*;
    use crate::in_memory_store::FlatIndex;
    use crate::vector_store::Metric;

    const KEYWORDS: [&str; 4] = ["hallmark", "caloric", "senescen", "pathway"];

    /// One dimension per keyword; queries mentioning "explode" get a
    /// mismatched dimension so the similarity search fails.
    fn keyword_embed(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        if lower.contains("explode") {
            return vec![1.0];
        }
        KEYWORDS
            .iter()
            .map(|k| if lower.contains(k) { 1.0 } else { 0.0 })
            .collect()
    }

    async fn vector_retriever(dir: &std::path::Path) -> Retriever<MockProvider> {
        let store = DocumentStore::open(dir).await;
        let embedder = MockProvider::default().with_embeddings(keyword_embed);
        let index = VectorIndex::build(
            embedder,
            FlatIndex::new(Metric::L2),
            store.all(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        Retriever::new(store, Some(index))
    }

    #[tokio::test]
    async fn lexical_retrieve_ranks_by_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let retriever: Retriever<MockProvider> =
            Retriever::lexical(DocumentStore::open(dir.path()).await);
        let docs = retriever
            .retrieve("How does caloric restriction affect lifespan?", 3)
            .await;
        assert_eq!(docs[0].id, "caloric_restriction_1");
        assert!(docs.len() <= 3);
        assert!(!retriever.uses_vector_search().await);
    }

    #[tokio::test]
    async fn zero_k_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = vector_retriever(dir.path()).await;
        assert!(retriever.retrieve("hallmark", 0).await.is_empty());
    }

    #[tokio::test]
    async fn vector_retrieve_uses_nearest_neighbors() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = vector_retriever(dir.path()).await;
        assert!(retriever.uses_vector_search().await);

        let docs = retriever.retrieve("caloric", 1).await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "caloric_restriction_1");
    }

    #[tokio::test]
    async fn vector_failure_falls_back_to_lexical() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = vector_retriever(dir.path()).await;

        let docs = retriever.retrieve("explode rapamycin", 3).await;
        assert_eq!(docs[0].id, "rapamycin_1");
        assert!(retriever.uses_vector_search().await);
    }

    #[tokio::test]
    async fn added_document_is_indexed_and_retrievable() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = vector_retriever(dir.path()).await;

        let doc = retriever
            .add_document(
                "X inhibits Y pathway.",
                DocumentMetadata::with_source("TestSource"),
                None,
            )
            .await
            .unwrap();
        assert_eq!(retriever.len().await, 6);
        assert!(retriever.uses_vector_search().await);

        let docs = retriever.retrieve("Y pathway", 3).await;
        assert!(docs.iter().any(|d| d.id == doc.id));
    }

    #[tokio::test]
    async fn embedding_failure_marks_index_stale() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path()).await;
        let mut embedder = MockProvider::default().with_embeddings(keyword_embed);
        let index = VectorIndex::build(
            embedder.clone(),
            FlatIndex::new(Metric::L2),
            store.all(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        let mut retriever = Retriever::new(store, Some(index));

        // Replace the index with one whose embedder fails from now on.
        embedder.fail_embed = true;
        {
            let state = retriever.state.get_mut();
            let rebuilt = VectorIndex::empty(embedder, FlatIndex::new(Metric::L2));
            let old = state.index.replace(rebuilt);
            assert_eq!(old.map(|i| i.len()), Some(5));
        }
        assert!(!retriever.uses_vector_search().await);

        retriever
            .add_document("Y pathway fact", DocumentMetadata::default(), None)
            .await
            .unwrap();
        let docs = retriever.retrieve("Y pathway", 3).await;
        assert!(docs.iter().any(|d| d.content == "Y pathway fact"));
    }

    #[tokio::test]
    async fn explicit_duplicate_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let retriever = vector_retriever(dir.path()).await;
        let result = retriever
            .add_document("dup", DocumentMetadata::default(), Some("mitochondria_1".into()))
            .await;
        assert!(matches!(result, Err(MemoryError::DuplicateId(_))));
        assert!(retriever.uses_vector_search().await);
    }

    #[tokio::test]
    async fn get_and_documents_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let retriever: Retriever<MockProvider> =
            Retriever::lexical(DocumentStore::open(dir.path()).await);
        assert_eq!(retriever.documents().await.len(), 5);
        assert!(retriever.get("rapamycin_1").await.is_some());
        assert!(retriever.get("missing").await.is_none());
        assert!(!retriever.is_empty().await);
    }
}
