//! Application bootstrap: config resolution, provider selection, store and index construction.

use std::path::{Path, PathBuf};

use aging_llm::EmbeddingProvider;
use aging_llm::any::AnyProvider;
use aging_llm::null::NullProvider;
use aging_llm::ollama::OllamaProvider;
use aging_memory::{DocumentStore, FlatIndex, Retriever, VectorIndex};

use crate::agent::AgingGpt;
use crate::config::{Config, ProviderKind};

/// Priority: explicit path > `AGING_GPT_CONFIG` env > `config/default.toml`.
#[must_use]
pub fn resolve_config_path(cli: Option<&Path>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_owned();
    }
    if let Ok(path) = std::env::var("AGING_GPT_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("config/default.toml")
}

#[must_use]
pub fn create_provider(config: &Config) -> AnyProvider {
    match config.llm.provider {
        ProviderKind::None => AnyProvider::Null(NullProvider),
        ProviderKind::Ollama => AnyProvider::Ollama(OllamaProvider::new(
            &config.llm.base_url,
            config.llm.model.clone(),
            config.llm.embedding_model.clone(),
        )),
    }
}

/// Degrades to the null capability when the backend does not answer.
pub async fn health_check(provider: AnyProvider) -> AnyProvider {
    let AnyProvider::Ollama(ollama) = &provider else {
        return provider;
    };
    match ollama.health_check().await {
        Ok(()) => tracing::info!(model = ollama.model(), "ollama health check passed"),
        Err(e) => {
            tracing::warn!("ollama health check failed, running without a model: {e:#}");
            return AnyProvider::Null(NullProvider);
        }
    }
    provider
}

/// Vector search when configured and supported; lexical otherwise.
pub async fn build_retriever(
    config: &Config,
    provider: &AnyProvider,
    store: DocumentStore,
) -> Retriever<AnyProvider> {
    if !config.retrieval.vector_search {
        tracing::info!("vector search disabled by configuration");
        return Retriever::lexical(store);
    }
    if !provider.supports_embeddings() {
        tracing::info!(
            provider = EmbeddingProvider::name(provider),
            "embeddings unavailable, using lexical search"
        );
        return Retriever::lexical(store);
    }

    match VectorIndex::build(
        provider.clone(),
        FlatIndex::new(config.retrieval.metric),
        store.all(),
        config.timeouts.embedding(),
    )
    .await
    {
        Ok(index) => {
            tracing::info!(vectors = index.len(), "vector index ready");
            Retriever::new(store, Some(index))
        }
        Err(e) => {
            tracing::warn!("vector index build failed, using lexical search: {e}");
            Retriever::lexical(store)
        }
    }
}

/// Assemble a ready-to-query agent. Every failure along the way degrades
/// rather than aborts.
pub async fn build_agent(config: &Config) -> AgingGpt<AnyProvider, AnyProvider> {
    let provider = health_check(create_provider(config)).await;
    let store = DocumentStore::open(config.knowledge.resolved_path()).await;
    tracing::info!(
        documents = store.len(),
        path = %store.path().display(),
        "knowledge store opened"
    );
    let retriever = build_retriever(config, &provider, store).await;
    AgingGpt::new(retriever, provider, config)
}

#[cfg(test)]
mod tests {
    use aging_llm::mock::MockProvider;
    use aging_llm::TextGenerator;
    use serial_test::serial;

    use super::*;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.knowledge.path = Some(dir.to_owned());
        config
    }

    fn axis_embed(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        vec![
            f32::from(u8::from(lower.contains("rapamycin"))),
            f32::from(u8::from(lower.contains("senescen"))),
            1.0,
        ]
    }

    #[test]
    #[serial]
    fn explicit_config_path_wins() {
        unsafe { std::env::set_var("AGING_GPT_CONFIG", "/from/env.toml") };
        assert_eq!(
            resolve_config_path(Some(Path::new("/cli.toml"))),
            PathBuf::from("/cli.toml")
        );
        assert_eq!(resolve_config_path(None), PathBuf::from("/from/env.toml"));
        unsafe { std::env::remove_var("AGING_GPT_CONFIG") };
        assert_eq!(
            resolve_config_path(None),
            PathBuf::from("config/default.toml")
        );
    }

    #[test]
    fn none_provider_is_null() {
        let provider = create_provider(&Config::default());
        assert!(matches!(provider, AnyProvider::Null(_)));
    }

    #[tokio::test]
    async fn unreachable_ollama_degrades_to_null() {
        let mut config = Config::default();
        config.llm.provider = ProviderKind::Ollama;
        config.llm.base_url = "http://127.0.0.1:1".into();
        let provider = health_check(create_provider(&config)).await;
        assert!(matches!(provider, AnyProvider::Null(_)));
    }

    #[tokio::test]
    async fn default_agent_is_minimal_and_lexical() {
        let dir = tempfile::tempdir().unwrap();
        let agent = build_agent(&config_in(dir.path())).await;
        assert!(!agent.is_rich());
        assert!(!agent.retriever().uses_vector_search().await);
        assert_eq!(agent.retriever().len().await, 5);
    }

    #[tokio::test]
    async fn embedding_provider_enables_vector_search() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let provider = AnyProvider::Mock(MockProvider::default().with_embeddings(axis_embed));
        let store = DocumentStore::open(dir.path()).await;

        let retriever = build_retriever(&config, &provider, store).await;
        assert!(retriever.uses_vector_search().await);
        let docs = retriever.retrieve("rapamycin", 1).await;
        assert_eq!(docs[0].id, "rapamycin_1");
    }

    #[tokio::test]
    async fn vector_search_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.retrieval.vector_search = false;
        let provider = AnyProvider::Mock(MockProvider::default().with_embeddings(axis_embed));
        let store = DocumentStore::open(dir.path()).await;

        let retriever = build_retriever(&config, &provider, store).await;
        assert!(!retriever.uses_vector_search().await);
    }

    #[tokio::test]
    async fn index_build_failure_falls_back_to_lexical() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut mock = MockProvider::default().with_embeddings(axis_embed);
        mock.fail_embed = true;
        let provider = AnyProvider::Mock(mock);
        let store = DocumentStore::open(dir.path()).await;

        let retriever = build_retriever(&config, &provider, store).await;
        assert!(!retriever.uses_vector_search().await);
        assert!(!retriever.retrieve("rapamycin", 3).await.is_empty());
        assert!(TextGenerator::is_available(&provider));
    }
}
