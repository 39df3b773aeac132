#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("document {0} already exists")]
    DuplicateId(String),

    #[error("vector index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("vector store error: {0}")]
    VectorStore(#[from] crate::vector_store::VectorStoreError),

    #[error("LLM error: {0}")]
    Llm(#[from] aging_llm::LlmError),

    #[error("embedding timed out after {0}s")]
    EmbeddingTimeout(u64),
}
