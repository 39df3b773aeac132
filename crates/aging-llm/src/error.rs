#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider unavailable")]
    Unavailable,

    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error("embedding not supported by {provider}")]
    EmbedUnsupported { provider: &'static str },

    #[error("generation request failed: {0}")]
    Generation(String),

    #[error("embedding request failed: {0}")]
    Embedding(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;
