//! The `AgingGpt` orchestrator: retrieval, refinement, generation and verification.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use aging_llm::{EmbeddingProvider, TextGenerator};
use aging_memory::{Document, DocumentMetadata, Retriever};
use futures::FutureExt;

use crate::config::{Config, PipelineConfig};
use crate::pipeline::{
    ContextCompressor, Generator, PipelineError, QueryRewriter, Reranker, Verifier,
};

pub const APOLOGY: &str =
    "Sorry, I encountered an error while processing your question. Please try again.";

pub struct AgingGpt<G, E> {
    provider: Arc<G>,
    retriever: Retriever<E>,
    rewriter: QueryRewriter<G>,
    reranker: Reranker,
    compressor: ContextCompressor,
    generator: Generator<G>,
    verifier: Verifier<G>,
    stages: PipelineConfig,
    top_k: usize,
}

impl<G, E> std::fmt::Debug for AgingGpt<G, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgingGpt")
            .field("top_k", &self.top_k)
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}

impl<G: TextGenerator, E: EmbeddingProvider> AgingGpt<G, E> {
    #[must_use]
    pub fn new(retriever: Retriever<E>, provider: G, config: &Config) -> Self {
        let provider = Arc::new(provider);
        let llm_timeout = config.timeouts.llm();
        Self {
            rewriter: QueryRewriter::new(Arc::clone(&provider), llm_timeout),
            generator: Generator::new(Arc::clone(&provider), llm_timeout),
            verifier: Verifier::new(Arc::clone(&provider), llm_timeout),
            reranker: Reranker,
            compressor: ContextCompressor::from_config(&config.pipeline),
            stages: config.pipeline.clone(),
            top_k: config.agent.top_k,
            retriever,
            provider,
        }
    }

    #[must_use]
    pub fn retriever(&self) -> &Retriever<E> {
        &self.retriever
    }

    #[must_use]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Whether the rewrite, rerank, compress and verify stages can run at all.
    #[must_use]
    pub fn is_rich(&self) -> bool {
        self.provider.is_available()
    }

    /// Answer `text` with the configured `top_k`. Never fails.
    pub async fn query(&self, text: &str) -> String {
        self.query_with_k(text, self.top_k).await
    }

    /// Internal failures, panics included, become [`APOLOGY`].
    pub async fn query_with_k(&self, text: &str, k: usize) -> String {
        match self.try_query(text, k).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("query pipeline failed: {e}");
                APOLOGY.to_owned()
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`PipelineError::Panicked`] if any stage panics.
    pub async fn try_query(&self, text: &str, k: usize) -> Result<String, PipelineError> {
        AssertUnwindSafe(self.run(text, k))
            .catch_unwind()
            .await
            .map_err(|payload| PipelineError::Panicked(panic_message(payload.as_ref())))
    }

    async fn run(&self, query: &str, k: usize) -> String {
        let documents = self.retriever.retrieve(query, k).await;
        tracing::debug!(retrieved = documents.len(), "retrieval complete");

        let rich = self.is_rich();
        let context = if rich {
            self.refine(query, documents).await
        } else {
            documents
        };

        let answer = self.generator.generate(query, &context).await;

        if rich && self.stages.verify && !answer.is_empty() && !context.is_empty() {
            match self.verifier.verify(query, &answer, &context).await {
                Ok(verified) => return verified,
                Err(e) => tracing::warn!("verification discarded: {e}"),
            }
        }
        answer
    }

    /// Rewrite, rerank and compress. Retrieval itself always uses the original query.
    async fn refine(&self, query: &str, documents: Vec<Document>) -> Vec<Document> {
        let focus = if self.stages.rewrite {
            self.rewriter.rewrite(query).await
        } else {
            query.to_owned()
        };

        let ranked = if self.stages.rerank {
            self.reranker
                .rerank(&focus, documents)
                .into_iter()
                .map(|scored| scored.document)
                .collect()
        } else {
            documents
        };

        if self.stages.compress {
            self.compressor.compress(&focus, &ranked)
        } else {
            ranked
        }
    }

    /// Store `content` attributed to `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the document.
    pub async fn add_knowledge(
        &self,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Document, PipelineError> {
        self.add_document(content, DocumentMetadata::with_source(source), None)
            .await
    }

    /// # Errors
    ///
    /// Returns [`aging_memory::MemoryError::DuplicateId`] for an explicit id that is taken.
    pub async fn add_document(
        &self,
        content: impl Into<String>,
        metadata: DocumentMetadata,
        id: Option<String>,
    ) -> Result<Document, PipelineError> {
        let document = self.retriever.add_document(content, metadata, id).await?;
        tracing::info!(id = %document.id, "knowledge added");
        Ok(document)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}

#[cfg(test)]
mod tests {
    use aging_llm::mock::MockProvider;
    use aging_llm::null::NullProvider;
    use aging_llm::{GenerationParams, LlmError};
    use aging_memory::DocumentStore;
    use tempfile::TempDir;

    use super::*;

    async fn retriever(dir: &TempDir) -> Retriever<NullProvider> {
        Retriever::lexical(DocumentStore::open(dir.path()).await)
    }

    struct PanickingGenerator;

    impl TextGenerator for PanickingGenerator {
        async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String, LlmError> {
            panic!("backend exploded")
        }

        #[allow(clippy::unnecessary_literal_bound)]
        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn minimal_configuration_answers_from_templates() {
        let dir = tempfile::tempdir().unwrap();
        let agent = AgingGpt::new(retriever(&dir).await, NullProvider, &Config::default());

        assert!(!agent.is_rich());
        let answer = agent.query("What are the hallmarks of aging?").await;
        assert!(answer.contains("hallmark"));
        for hallmark in [
            "genomic instability",
            "telomere attrition",
            "epigenetic alterations",
            "loss of proteostasis",
            "deregulated nutrient sensing",
            "mitochondrial dysfunction",
            "cellular senescence",
            "stem cell exhaustion",
            "altered intercellular communication",
        ] {
            assert!(answer.contains(hallmark), "missing {hallmark}");
        }
    }

    #[tokio::test]
    async fn rich_configuration_runs_every_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockProvider::with_responses(vec![
            "rapamycin mTOR lifespan longevity".into(),
            "Rapamycin extends lifespan [4].".into(),
            "Rapamycin extends lifespan in mice via mTOR.".into(),
        ]);
        let agent = AgingGpt::new(retriever(&dir).await, mock.clone(), &Config::default());

        let answer = agent.query("Tell me about rapamycin and aging.").await;
        assert_eq!(answer, "Rapamycin extends lifespan in mice via mTOR.");

        let prompts = mock.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].0.contains("Question: Tell me about rapamycin and aging."));
        assert!(prompts[1].0.contains("Rapamycin, which inhibits the mTOR pathway"));
        assert!(prompts[2].0.contains("Draft answer: Rapamycin extends lifespan [4]."));
    }

    #[tokio::test]
    async fn degenerate_verification_keeps_draft() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockProvider::with_responses(vec![
            "expanded".into(),
            "The drafted answer about senescence.".into(),
            "ok".into(),
        ]);
        let agent = AgingGpt::new(retriever(&dir).await, mock, &Config::default());
        let answer = agent.query("What is cellular senescence?").await;
        assert_eq!(answer, "The drafted answer about senescence.");
    }

    #[tokio::test]
    async fn disabled_stages_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.pipeline.rewrite = false;
        config.pipeline.verify = false;
        let mock = MockProvider::with_responses(vec!["Only the answer.".into()]);
        let agent = AgingGpt::new(retriever(&dir).await, mock.clone(), &config);

        assert_eq!(agent.query("senescence").await, "Only the answer.");
        assert_eq!(mock.prompts().len(), 1);
    }

    #[tokio::test]
    async fn failing_generation_degrades_to_templates() {
        let dir = tempfile::tempdir().unwrap();
        let agent = AgingGpt::new(retriever(&dir).await, MockProvider::failing(), &Config::default());
        let answer = agent.query("How does caloric restriction affect lifespan?").await;
        assert!(answer.contains("Caloric Restriction Research"));
    }

    #[tokio::test]
    async fn added_knowledge_reaches_the_answer() {
        let dir = tempfile::tempdir().unwrap();
        let agent = AgingGpt::new(retriever(&dir).await, NullProvider, &Config::default());

        let doc = agent
            .add_knowledge("X inhibits Y pathway.", "TestSource")
            .await
            .unwrap();
        assert_eq!(doc.metadata.source.as_deref(), Some("TestSource"));

        let answer = agent.query("Y pathway").await;
        assert!(answer.contains("X inhibits Y pathway."));
        assert!(answer.contains("TestSource"));
    }

    #[tokio::test]
    async fn duplicate_explicit_id_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let agent = AgingGpt::new(retriever(&dir).await, NullProvider, &Config::default());
        let err = agent
            .add_document("dup", DocumentMetadata::default(), Some("rapamycin_1".into()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Memory(aging_memory::MemoryError::DuplicateId(_))
        ));
    }

    #[tokio::test]
    async fn panics_become_the_apology() {
        let dir = tempfile::tempdir().unwrap();
        let agent = AgingGpt::new(retriever(&dir).await, PanickingGenerator, &Config::default());

        let err = agent.try_query("anything", 3).await.unwrap_err();
        assert!(matches!(err, PipelineError::Panicked(ref msg) if msg == "backend exploded"));
        assert_eq!(agent.query("anything").await, APOLOGY);
    }
}
