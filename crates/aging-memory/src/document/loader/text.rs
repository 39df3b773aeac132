use std::path::Path;
use std::pin::Pin;

use crate::document::{
    DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentLoader, DocumentMetadata,
    TextSplitter, file_stem, read_capped,
};

/// Loads a plain-text or markdown file as paragraph chunks.
pub struct TextLoader {
    pub max_file_size: u64,
    pub splitter: TextSplitter,
}

impl Default for TextLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            splitter: TextSplitter::default(),
        }
    }
}

impl DocumentLoader for TextLoader {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>>
    {
        let path = path.to_path_buf();
        Box::pin(async move {
            let path = std::fs::canonicalize(&path)?;
            let content = read_capped(&path, self.max_file_size).await?;

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            let content_type = match ext {
                "md" | "markdown" => "text/markdown",
                _ => "text/plain",
            };
            let stem = file_stem(&path);
            let source = path.display().to_string();

            let documents: Vec<Document> = self
                .splitter
                .split(&content)
                .into_iter()
                .enumerate()
                .map(|(i, chunk)| {
                    let mut metadata = DocumentMetadata::with_source(source.clone());
                    metadata.extra.insert("chunk".into(), serde_json::json!(i));
                    metadata
                        .extra
                        .insert("content_type".into(), serde_json::json!(content_type));
                    Document::new(format!("{stem}_{i}"), chunk, metadata)
                })
                .collect();

            tracing::info!(chunks = documents.len(), path = %source, "loaded text file");
            Ok(documents)
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt", "md", "markdown"]
    }
}
