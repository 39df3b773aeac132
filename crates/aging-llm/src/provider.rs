use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Sampling parameters for a single completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Upper bound on generated tokens.
    pub max_tokens: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub repeat_penalty: f32,
    /// Number of samples requested; backends that cannot sample more than one ignore it.
    pub num_samples: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
            top_p: 0.9,
            repeat_penalty: 1.1,
            num_samples: 1,
        }
    }
}

impl GenerationParams {
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Prompt-in, continuation-out generative capability.
pub trait TextGenerator: Send + Sync {
    /// Generate a continuation for `prompt`.
    ///
    /// Backends may return the prompt echoed in front of the continuation;
    /// callers are expected to strip it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the response is invalid.
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// Whether this generator can serve requests at all.
    ///
    /// The null capability reports `false`, which keeps the pipeline in its
    /// minimal configuration.
    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// Text to fixed-length vector capability.
pub trait EmbeddingProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the backend does not support embeddings or the request fails.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, LlmError>> + Send;

    fn supports_embeddings(&self) -> bool;

    fn name(&self) -> &str;
}
