use std::sync::Arc;
use std::time::Duration;

use aging_llm::{GenerationParams, TextGenerator};

use super::prompt::PromptBuilder;
use super::terms::word_count;
use super::{GenerationError, complete};

const EXPANSION_TOKENS: usize = 100;
const TEMPERATURE: f32 = 0.3;

/// Expands a query with related scientific terms. Passthrough on any failure.
pub struct QueryRewriter<G> {
    provider: Arc<G>,
    prompts: PromptBuilder,
    timeout: Duration,
}

impl<G: TextGenerator> QueryRewriter<G> {
    #[must_use]
    pub fn new(provider: Arc<G>, timeout: Duration) -> Self {
        Self {
            provider,
            prompts: PromptBuilder,
            timeout,
        }
    }

    /// # Errors
    ///
    /// Returns [`GenerationError`] if the expansion could not be produced.
    pub async fn try_rewrite(&self, query: &str) -> Result<String, GenerationError> {
        let prompt = self.prompts.rewrite(query);
        let params = GenerationParams::default()
            .with_max_tokens(word_count(&prompt) + EXPANSION_TOKENS)
            .with_temperature(TEMPERATURE);
        complete(self.provider.as_ref(), &prompt, &params, self.timeout).await
    }

    pub async fn rewrite(&self, query: &str) -> String {
        if !self.provider.is_available() {
            return query.to_owned();
        }
        match self.try_rewrite(query).await {
            Ok(expanded) => {
                tracing::debug!(original = query, expanded = %expanded, "query rewritten");
                expanded
            }
            Err(e) => {
                tracing::warn!("query rewrite failed, keeping original: {e}");
                query.to_owned()
            }
        }
    }
}
