use std::sync::Arc;
use std::time::Duration;

use aging_llm::{GenerationParams, TextGenerator};
use aging_memory::Document;

use super::prompt::PromptBuilder;
use super::terms::word_count;
use super::{GenerationError, complete};

/// Revisions this short are treated as degenerate.
const MIN_REVISION_CHARS: usize = 20;
const TEMPERATURE: f32 = 0.3;

/// Asks the generative capability to fact-check a draft answer against its context.
pub struct Verifier<G> {
    provider: Arc<G>,
    prompts: PromptBuilder,
    timeout: Duration,
}

impl<G: TextGenerator> Verifier<G> {
    #[must_use]
    pub fn new(provider: Arc<G>, timeout: Duration) -> Self {
        Self {
            provider,
            prompts: PromptBuilder,
            timeout,
        }
    }

    /// Returns the corrected answer. The output budget equals the prompt's word
    /// count, so corrections are short.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] on any generation failure or when the revision
    /// is 20 characters or shorter. Callers keep the draft in that case.
    pub async fn verify(
        &self,
        query: &str,
        answer: &str,
        context: &[Document],
    ) -> Result<String, GenerationError> {
        let prompt = self.prompts.verify(query, answer, context);
        let params = GenerationParams::default()
            .with_max_tokens(word_count(&prompt))
            .with_temperature(TEMPERATURE);
        let revision = complete(self.provider.as_ref(), &prompt, &params, self.timeout).await?;

        let chars = revision.chars().count();
        if chars <= MIN_REVISION_CHARS {
            return Err(GenerationError::Degenerate(chars));
        }
        Ok(revision)
    }
}
