use std::path::PathBuf;

use super::Config;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_llm();
        self.apply_env_overrides_retrieval();
        self.apply_env_overrides_pipeline();
    }

    fn apply_env_overrides_llm(&mut self) {
        if let Ok(v) = std::env::var("AGING_LLM_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.to_lowercase())) {
                self.llm.provider = kind;
            } else {
                tracing::warn!("ignoring invalid AGING_LLM_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("AGING_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("AGING_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("AGING_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Ok(v) = std::env::var("AGING_TIMEOUT_LLM")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.timeouts.llm_seconds = secs;
        }
        if let Ok(v) = std::env::var("AGING_TIMEOUT_EMBEDDING")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.timeouts.embedding_seconds = secs;
        }
    }

    fn apply_env_overrides_retrieval(&mut self) {
        if let Ok(v) = std::env::var("AGING_KB_PATH") {
            self.knowledge.path = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("AGING_TOP_K")
            && let Ok(k) = v.parse::<usize>()
        {
            self.agent.top_k = k;
        }
        if let Ok(v) = std::env::var("AGING_VECTOR_SEARCH")
            && let Ok(enabled) = v.parse::<bool>()
        {
            self.retrieval.vector_search = enabled;
        }
        if let Ok(v) = std::env::var("AGING_VECTOR_METRIC") {
            match v.parse() {
                Ok(metric) => self.retrieval.metric = metric,
                Err(e) => tracing::warn!("ignoring invalid AGING_VECTOR_METRIC value: {e}"),
            }
        }
    }

    fn apply_env_overrides_pipeline(&mut self) {
        if let Ok(v) = std::env::var("AGING_PIPELINE_REWRITE")
            && let Ok(enabled) = v.parse::<bool>()
        {
            self.pipeline.rewrite = enabled;
        }
        if let Ok(v) = std::env::var("AGING_PIPELINE_RERANK")
            && let Ok(enabled) = v.parse::<bool>()
        {
            self.pipeline.rerank = enabled;
        }
        if let Ok(v) = std::env::var("AGING_PIPELINE_COMPRESS")
            && let Ok(enabled) = v.parse::<bool>()
        {
            self.pipeline.compress = enabled;
        }
        if let Ok(v) = std::env::var("AGING_PIPELINE_VERIFY")
            && let Ok(enabled) = v.parse::<bool>()
        {
            self.pipeline.verify = enabled;
        }
    }
}
