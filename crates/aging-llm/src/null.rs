//! Capability stand-in used when no model backend is configured.

use crate::error::LlmError;
use crate::provider::{EmbeddingProvider, GenerationParams, TextGenerator};

#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvider;

impl TextGenerator for NullProvider {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String, LlmError> {
        Err(LlmError::Unavailable)
    }

    fn is_available(&self) -> bool {
        false
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "none"
    }
}

impl EmbeddingProvider for NullProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, LlmError> {
        Err(LlmError::EmbedUnsupported { provider: "none" })
    }

    fn supports_embeddings(&self) -> bool {
        false
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generate_is_unavailable() {
        let provider = NullProvider;
        let result = provider
            .generate("prompt", &GenerationParams::default())
            .await;
        assert!(matches!(result, Err(LlmError::Unavailable)));
        assert!(!TextGenerator::is_available(&provider));
    }

    #[tokio::test]
    async fn embed_is_unsupported() {
        let provider = NullProvider;
        assert!(!provider.supports_embeddings());
        assert!(matches!(
            provider.embed("text").await,
            Err(LlmError::EmbedUnsupported { provider: "none" })
        ));
    }
}
