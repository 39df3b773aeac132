mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// the resulting configuration is invalid.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error describing the first out-of-range value.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.agent.top_k == 0 {
            bail!("agent.top_k must be at least 1");
        }
        if self.pipeline.max_context_documents == 0 {
            bail!("pipeline.max_context_documents must be at least 1");
        }
        if self.pipeline.max_sentences == 0 {
            bail!("pipeline.max_sentences must be at least 1");
        }
        if self.timeouts.llm_seconds == 0 {
            bail!("timeouts.llm_seconds must be at least 1");
        }
        if self.timeouts.embedding_seconds == 0 {
            bail!("timeouts.embedding_seconds must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.pipeline.relevance_threshold) {
            bail!(
                "pipeline.relevance_threshold must be within [0, 1], got {}",
                self.pipeline.relevance_threshold
            );
        }
        Ok(())
    }
}
