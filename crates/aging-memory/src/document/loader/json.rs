use std::path::Path;
use std::pin::Pin;

use serde_json::Value;

use crate::document::{
    DEFAULT_MAX_FILE_SIZE, Document, DocumentError, DocumentLoader, DocumentMetadata, file_stem,
    read_capped,
};

/// Loads documents from a JSON array of objects or a single object.
pub struct JsonLoader {
    pub content_key: String,
    pub metadata_key: String,
    pub max_file_size: u64,
}

impl Default for JsonLoader {
    fn default() -> Self {
        Self {
            content_key: "content".into(),
            metadata_key: "metadata".into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl JsonLoader {
    fn to_document(&self, item: &Value, default_id: String, source: &str) -> Option<Document> {
        let object = item.as_object()?;
        let content = object
            .get(&self.content_key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let mut metadata = object
            .get(&self.metadata_key)
            .cloned()
            .map(DocumentMetadata::from)
            .unwrap_or_default();
        metadata.extra.remove("source");
        metadata.source = Some(source.to_owned());

        let id = object
            .get("id")
            .and_then(Value::as_str)
            .map_or(default_id, str::to_owned);
        Some(Document::new(id, content, metadata))
    }
}

impl DocumentLoader for JsonLoader {
    fn load(
        &self,
        path: &Path,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<Document>, DocumentError>> + Send + '_>>
    {
        let path = path.to_path_buf();
        Box::pin(async move {
            let raw = read_capped(&path, self.max_file_size).await?;
            let data: Value = serde_json::from_str(&raw)?;
            let stem = file_stem(&path);
            let source = path.display().to_string();

            let documents: Vec<Document> = match &data {
                Value::Array(items) => items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, item)| {
                        let doc = self.to_document(item, format!("{stem}_{i}"), &source);
                        if doc.is_none() {
                            tracing::error!(index = i, "skipping malformed JSON item in {source}");
                        }
                        doc
                    })
                    .collect(),
                Value::Object(_) => self
                    .to_document(&data, stem.clone(), &source)
                    .into_iter()
                    .collect(),
                _ => {
                    return Err(DocumentError::UnsupportedFormat(format!(
                        "{source}: expected a JSON object or array"
                    )));
                }
            };

            tracing::info!(documents = documents.len(), path = %source, "loaded JSON file");
            Ok(documents)
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}
