mod json;
mod pubmed;
mod text;

pub use json::JsonLoader;
pub use pubmed::PubMedSampleLoader;
pub use text::TextLoader;
