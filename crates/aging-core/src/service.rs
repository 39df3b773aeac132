//! Request/response boundary used by the CLI and any embedding application.

use aging_llm::any::AnyProvider;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::agent::{APOLOGY, AgingGpt};
use crate::bootstrap::build_agent;
use crate::config::Config;

pub const EMPTY_QUERY: &str = "Please enter a question about aging biology.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeResponse {
    pub message: String,
    pub status: Status,
}

type Agent = AgingGpt<AnyProvider, AnyProvider>;

/// Owns the process-wide agent, built on first use. Concurrent first calls
/// share a single initialization.
pub struct AgingGptService {
    config: Config,
    agent: OnceCell<Agent>,
}

impl std::fmt::Debug for AgingGptService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgingGptService")
            .field("initialized", &self.agent.initialized())
            .finish_non_exhaustive()
    }
}

impl AgingGptService {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            agent: OnceCell::new(),
        }
    }

    /// Wrap an already built agent.
    #[must_use]
    pub fn from_agent(agent: Agent) -> Self {
        Self {
            config: Config::default(),
            agent: OnceCell::new_with(Some(agent)),
        }
    }

    pub async fn agent(&self) -> &Agent {
        self.agent
            .get_or_init(|| async {
                tracing::info!(name = %self.config.agent.name, "initializing agent");
                build_agent(&self.config).await
            })
            .await
    }

    pub async fn query(&self, text: &str) -> QueryResponse {
        let text = text.trim();
        if text.is_empty() {
            return QueryResponse {
                response: EMPTY_QUERY.to_owned(),
                status: Status::Error,
            };
        }

        let agent = self.agent().await;
        match agent.try_query(text, agent.top_k()).await {
            Ok(response) => QueryResponse {
                response,
                status: Status::Success,
            },
            Err(e) => {
                tracing::error!("query failed: {e}");
                QueryResponse {
                    response: APOLOGY.to_owned(),
                    status: Status::Error,
                }
            }
        }
    }

    pub async fn add_knowledge(&self, content: &str, source: &str) -> KnowledgeResponse {
        match self.agent().await.add_knowledge(content, source).await {
            Ok(_) => KnowledgeResponse {
                message: format!("Successfully added new knowledge from {source}"),
                status: Status::Success,
            },
            Err(e) => {
                tracing::error!("failed to add knowledge: {e}");
                KnowledgeResponse {
                    message: format!("Error adding knowledge: {e}"),
                    status: Status::Error,
                }
            }
        }
    }
}
