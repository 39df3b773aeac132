//! Test-only mock provider.

use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::provider::{EmbeddingProvider, GenerationParams, TextGenerator};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<(String, GenerationParams)>>>,
    pub default_response: String,
    pub embedding: Vec<f32>,
    /// Computes the embedding from the text when set; takes precedence over `embedding`.
    pub embedding_fn: Option<fn(&str) -> Vec<f32>>,
    pub supports_embeddings: bool,
    pub fail_generate: bool,
    pub fail_embed: bool,
    /// Echo the prompt in front of every response, like raw completion backends do.
    pub echo_prompt: bool,
    /// Milliseconds to sleep before returning a response.
    pub delay_ms: u64,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            embedding: vec![0.0; 8],
            embedding_fn: None,
            supports_embeddings: false,
            fail_generate: false,
            fail_embed: false,
            echo_prompt: false,
            delay_ms: 0,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_generate: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_embeddings(mut self, embedding_fn: fn(&str) -> Vec<f32>) -> Self {
        self.supports_embeddings = true;
        self.embedding_fn = Some(embedding_fn);
        self
    }

    #[must_use]
    pub fn with_echo(mut self) -> Self {
        self.echo_prompt = true;
        self
    }

    #[must_use]
    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Prompts received so far, with the parameters they were sent with.
    #[must_use]
    pub fn prompts(&self) -> Vec<(String, GenerationParams)> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for MockProvider {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError> {
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_owned(), params.clone()));
        if self.fail_generate {
            return Err(LlmError::Generation("mock generation error".into()));
        }
        let response = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                self.default_response.clone()
            } else {
                responses.remove(0)
            }
        };
        if self.echo_prompt {
            Ok(format!("{prompt}{response}"))
        } else {
            Ok(response)
        }
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}

impl EmbeddingProvider for MockProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        if !self.supports_embeddings {
            return Err(LlmError::EmbedUnsupported { provider: "mock" });
        }
        if self.fail_embed {
            return Err(LlmError::Embedding("mock embedding error".into()));
        }
        Ok(self
            .embedding_fn
            .map_or_else(|| self.embedding.clone(), |f| f(text)))
    }

    fn supports_embeddings(&self) -> bool {
        self.supports_embeddings
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_responses_then_default() {
        let mock = MockProvider::with_responses(vec!["first".into()]);
        let params = GenerationParams::default();
        assert_eq!(mock.generate("p", &params).await.unwrap(), "first");
        assert_eq!(mock.generate("p", &params).await.unwrap(), "mock response");
        assert_eq!(mock.prompts().len(), 2);
    }

    #[tokio::test]
    async fn echo_prefixes_prompt() {
        let mock = MockProvider::with_responses(vec![" tail".into()]).with_echo();
        let out = mock
            .generate("head", &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(out, "head tail");
    }

    #[tokio::test]
    async fn embedding_fn_is_used() {
        fn len_embed(text: &str) -> Vec<f32> {
            #[allow(clippy::cast_precision_loss)]
            vec![text.len() as f32]
        }
        let mock = MockProvider::default().with_embeddings(len_embed);
        assert_eq!(mock.embed("abc").await.unwrap(), vec![3.0]);
    }

    #[tokio::test]
    async fn failing_generation() {
        let mock = MockProvider::failing();
        assert!(
            mock.generate("p", &GenerationParams::default())
                .await
                .is_err()
        );
    }
}
