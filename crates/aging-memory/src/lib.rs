//! Knowledge storage and retrieval: JSON-file document store, lexical and
//! vector search, and the retriever that unifies them.

pub mod document;
pub mod error;
pub mod in_memory_store;
pub mod lexical;
pub mod retriever;
pub mod seed;
pub mod store;
pub mod vector_index;
pub mod vector_store;

pub use document::{Document, DocumentMetadata, ScoredDocument};
pub use error::MemoryError;
pub use in_memory_store::FlatIndex;
pub use retriever::Retriever;
pub use store::{DocumentStore, default_path};
pub use vector_index::VectorIndex;
pub use vector_store::{Metric, Neighbor, SimilaritySearch, VectorStoreError};
