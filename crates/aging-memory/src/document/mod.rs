pub mod error;
pub mod loader;
pub mod splitter;
pub mod types;

pub use error::DocumentError;
pub use loader::{JsonLoader, PubMedSampleLoader, TextLoader};
pub use splitter::{SplitterConfig, TextSplitter, split_sentences};
pub use types::{Document, DocumentMetadata, ScoredDocument};

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub trait DocumentLoader: Send + Sync {
    fn load(
        &self,
        path: &std::path::Path,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>,
    >;

    fn supported_extensions(&self) -> &[&str];
}

/// Read a file after checking it against `max_size`.
pub(crate) async fn read_capped(
    path: &std::path::Path,
    max_size: u64,
) -> Result<String, DocumentError> {
    let meta = tokio::fs::metadata(path).await?;
    if meta.len() > max_size {
        return Err(DocumentError::FileTooLarge(meta.len()));
    }
    Ok(tokio::fs::read_to_string(path).await?)
}

pub(crate) fn file_stem(path: &std::path::Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_owned()
}
