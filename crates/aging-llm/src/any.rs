#[cfg(feature = "mock")]
use crate::mock::MockProvider;
use crate::null::NullProvider;
use crate::ollama::OllamaProvider;

use crate::error::LlmError;
use crate::provider::{EmbeddingProvider, GenerationParams, TextGenerator};

/// Generates a match over all `AnyProvider` variants, binding the inner provider
/// and evaluating the given closure for each arm.
macro_rules! delegate_provider {
    ($self:expr, |$p:ident| $expr:expr) => {
        match $self {
            AnyProvider::Null($p) => $expr,
            AnyProvider::Ollama($p) => $expr,
            #[cfg(feature = "mock")]
            AnyProvider::Mock($p) => $expr,
        }
    };
}

/// Backend selected at startup from configuration.
#[derive(Debug, Clone)]
pub enum AnyProvider {
    Null(NullProvider),
    Ollama(OllamaProvider),
    #[cfg(feature = "mock")]
    Mock(MockProvider),
}

impl Default for AnyProvider {
    fn default() -> Self {
        Self::Null(NullProvider)
    }
}

impl TextGenerator for AnyProvider {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError> {
        delegate_provider!(self, |p| p.generate(prompt, params).await)
    }

    fn is_available(&self) -> bool {
        delegate_provider!(self, |p| TextGenerator::is_available(p))
    }

    fn name(&self) -> &str {
        delegate_provider!(self, |p| TextGenerator::name(p))
    }
}

impl EmbeddingProvider for AnyProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        delegate_provider!(self, |p| p.embed(text).await)
    }

    fn supports_embeddings(&self) -> bool {
        delegate_provider!(self, |p| p.supports_embeddings())
    }

    fn name(&self) -> &str {
        delegate_provider!(self, |p| EmbeddingProvider::name(p))
    }
}
