//! Generation and embedding capability interfaces and backend implementations.

pub mod any;
pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
pub mod null;
pub mod ollama;
pub mod provider;

pub use error::LlmError;
pub use provider::{EmbeddingProvider, GenerationParams, TextGenerator};
