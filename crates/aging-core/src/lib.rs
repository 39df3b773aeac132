//! AgingGPT query pipeline, orchestrator, configuration loading, and service boundary.

pub mod agent;
pub mod bootstrap;
pub mod config;
pub mod pipeline;
pub mod service;

pub use agent::{APOLOGY, AgingGpt};
pub use service::{AgingGptService, KnowledgeResponse, QueryResponse, Status};
