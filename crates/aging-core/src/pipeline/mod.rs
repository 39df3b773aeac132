//! Query pipeline stages: rewrite, rerank, compress, prompt, generate, verify.

pub mod compressor;
pub mod generator;
pub mod prompt;
pub mod reranker;
pub mod responder;
pub mod rewriter;
pub mod terms;
pub mod verifier;

use std::time::Duration;

use aging_llm::{GenerationParams, LlmError, TextGenerator};

pub use compressor::ContextCompressor;
pub use generator::Generator;
pub use prompt::PromptBuilder;
pub use reranker::Reranker;
pub use responder::RuleBasedResponder;
pub use rewriter::QueryRewriter;
pub use verifier::Verifier;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Memory(#[from] aging_memory::MemoryError),

    #[error("pipeline panicked: {0}")]
    Panicked(String),
}

/// Failure of a single generative call. Every variant has a fallback at the call site.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no generative capability configured")]
    Unavailable,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("generation returned no text")]
    Empty,

    #[error("revision too short ({0} chars)")]
    Degenerate(usize),
}

/// Runs one bounded completion and returns the trimmed continuation.
pub(crate) async fn complete<G: TextGenerator>(
    generator: &G,
    prompt: &str,
    params: &GenerationParams,
    timeout: Duration,
) -> Result<String, GenerationError> {
    if !generator.is_available() {
        return Err(GenerationError::Unavailable);
    }
    let raw = tokio::time::timeout(timeout, generator.generate(prompt, params))
        .await
        .map_err(|_| GenerationError::Timeout(timeout))??;

    let text = strip_prompt_echo(&raw, prompt).trim();
    if text.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(text.to_owned())
}

/// Raw completion backends may return `prompt + continuation`.
#[must_use]
pub fn strip_prompt_echo<'a>(output: &'a str, prompt: &str) -> &'a str {
    output.strip_prefix(prompt).unwrap_or(output)
}
