use std::sync::Arc;
use std::time::Duration;

use aging_llm::{GenerationParams, TextGenerator};
use aging_memory::Document;

use super::prompt::PromptBuilder;
use super::responder::RuleBasedResponder;
use super::terms::word_count;
use super::{GenerationError, complete};

/// Output allowance on top of the prompt length.
const ANSWER_TOKENS: usize = 512;

/// Answers a query from context, preferring the generative capability and
/// falling back to the rule-based templates.
pub struct Generator<G> {
    provider: Arc<G>,
    prompts: PromptBuilder,
    fallback: RuleBasedResponder,
    timeout: Duration,
}

impl<G: TextGenerator> Generator<G> {
    #[must_use]
    pub fn new(provider: Arc<G>, timeout: Duration) -> Self {
        Self {
            provider,
            prompts: PromptBuilder,
            fallback: RuleBasedResponder,
            timeout,
        }
    }

    /// Grounded generation only, without the rule-based fallback.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the capability is absent, fails, times out
    /// or produces nothing after the echoed prompt.
    pub async fn try_generate(
        &self,
        query: &str,
        context: &[Document],
    ) -> Result<String, GenerationError> {
        let prompt = self.prompts.answer(query, context);
        let params = GenerationParams::default().with_max_tokens(word_count(&prompt) + ANSWER_TOKENS);
        complete(self.provider.as_ref(), &prompt, &params, self.timeout).await
    }

    /// Never fails; the rule-based responder covers every generation failure.
    pub async fn generate(&self, query: &str, context: &[Document]) -> String {
        if !self.provider.is_available() {
            return self.fallback.respond(query, context);
        }
        match self.try_generate(query, context).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("generation failed, using rule-based answer: {e}");
                self.fallback.respond(query, context)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use aging_llm::mock::MockProvider;
    use aging_llm::null::NullProvider;
    use aging_memory::seed::default_knowledge;

    use super::*;
    use crate::pipeline::responder::NO_INFORMATION;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn uses_generative_answer_with_sampling_params() {
        let mock = Arc::new(MockProvider::with_responses(vec!["Generated answer".into()]));
        let generator = Generator::new(Arc::clone(&mock), TIMEOUT);
        let context = default_knowledge();

        let answer = generator.generate("What is rapamycin?", &context).await;
        assert_eq!(answer, "Generated answer");

        let prompts = mock.prompts();
        assert_eq!(prompts.len(), 1);
        let (prompt, params) = &prompts[0];
        assert!(prompt.contains("Question: What is rapamycin?"));
        assert_eq!(params.max_tokens, word_count(prompt) + 512);
        assert!((params.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(params.num_samples, 1);
    }

    #[tokio::test]
    async fn strips_echoed_prompt() {
        let mock = Arc::new(MockProvider::with_responses(vec![" Continuation.".into()]).with_echo());
        let generator = Generator::new(mock, TIMEOUT);
        let answer = generator.generate("q", &default_knowledge()).await;
        assert_eq!(answer, "Continuation.");
    }

    #[tokio::test]
    async fn falls_back_on_failure() {
        let generator = Generator::new(Arc::new(MockProvider::failing()), TIMEOUT);
        let answer = generator
            .generate("What are the hallmarks of aging?", &default_knowledge())
            .await;
        assert!(answer.starts_with("## Hallmarks of Aging"));
    }

    #[tokio::test]
    async fn falls_back_on_timeout() {
        let generator = Generator::new(
            Arc::new(MockProvider::default().with_delay(200)),
            Duration::from_millis(20),
        );
        let answer = generator.generate("anything", &[]).await;
        assert_eq!(answer, NO_INFORMATION);
    }

    #[tokio::test]
    async fn null_capability_goes_straight_to_rules() {
        let generator = Generator::new(Arc::new(NullProvider), TIMEOUT);
        assert_eq!(generator.generate("anything", &[]).await, NO_INFORMATION);
        assert!(matches!(
            generator.try_generate("anything", &[]).await,
            Err(GenerationError::Unavailable)
        ));
    }
}
