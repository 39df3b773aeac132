use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentMetadata};
use crate::error::MemoryError;
use crate::lexical;
use crate::seed;

const DOCUMENTS_DIR: &str = "documents";

#[derive(Serialize)]
struct RecordRef<'a> {
    id: &'a str,
    content: &'a str,
    metadata: &'a DocumentMetadata,
    sequence: u64,
}

#[derive(Deserialize)]
struct Record {
    id: String,
    content: String,
    #[serde(default)]
    metadata: DocumentMetadata,
    #[serde(default)]
    sequence: Option<u64>,
}

/// Durable document collection: one JSON record per document under
/// `<base>/documents`, mirrored by an insertion-ordered working set.
#[derive(Debug)]
pub struct DocumentStore {
    base_path: PathBuf,
    docs_path: PathBuf,
    documents: Vec<Document>,
    next_sequence: u64,
}

/// `$HOME/.aging_gpt_kb`, or `./.aging_gpt_kb` when no home directory is known.
#[must_use]
pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".aging_gpt_kb")
}

impl DocumentStore {
    /// Open the store at `base_path`, loading every record found there.
    ///
    /// An empty location is seeded with the built-in knowledge set. Storage
    /// failures are logged and the store continues in memory.
    pub async fn open(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        let docs_path = base_path.join(DOCUMENTS_DIR);
        if let Err(e) = tokio::fs::create_dir_all(&docs_path).await {
            tracing::error!("failed to create knowledge base directory {}: {e}", docs_path.display());
        }

        let records = load_records(&docs_path).await;
        let next_sequence = records
            .iter()
            .filter_map(|r| r.sequence)
            .max()
            .map_or(records.len() as u64, |max| max + 1);
        let documents = records
            .into_iter()
            .map(|r| Document::new(r.id, r.content, r.metadata))
            .collect();

        let mut store = Self {
            base_path,
            docs_path,
            documents,
            next_sequence,
        };

        if store.documents.is_empty() {
            tracing::info!("knowledge base is empty, seeding default knowledge");
            for doc in seed::default_knowledge() {
                if let Err(e) = store.add(doc.content, doc.metadata, Some(doc.id)).await {
                    tracing::error!("failed to seed default knowledge: {e}");
                }
            }
        }

        tracing::info!(
            documents = store.documents.len(),
            path = %store.base_path.display(),
            "initialized knowledge base"
        );
        store
    }

    /// Add a document, persisting it as `<id>.json`.
    ///
    /// Without an explicit id, `doc_<count + 1>` is generated, skipping ids
    /// already taken. A persistence failure is logged and the document is
    /// still kept in the working set.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::DuplicateId`] if an explicit `id` already exists.
    pub async fn add(
        &mut self,
        content: impl Into<String>,
        metadata: DocumentMetadata,
        id: Option<String>,
    ) -> Result<Document, MemoryError> {
        let id = match id {
            Some(id) if self.contains(&id) => return Err(MemoryError::DuplicateId(id)),
            Some(id) => id,
            None => self.generate_id(),
        };
        let document = Document::new(id, content, metadata);
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        if let Err(e) = self.persist(&document, sequence).await {
            tracing::error!("error persisting document {}: {e}", document.id);
        }

        self.documents.push(document.clone());
        tracing::info!(id = %document.id, "added document");
        Ok(document)
    }

    fn generate_id(&self) -> String {
        let mut n = self.documents.len() + 1;
        loop {
            let candidate = format!("doc_{n}");
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    async fn persist(&self, document: &Document, sequence: u64) -> Result<(), MemoryError> {
        let path = self.record_path(&document.id)?;
        let record = RecordRef {
            id: &document.id,
            content: &document.content,
            metadata: &document.metadata,
            sequence,
        };
        let json = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(&path, json).await?;
        Ok(())
    }

    fn record_path(&self, id: &str) -> Result<PathBuf, MemoryError> {
        if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
            return Err(MemoryError::Storage(format!(
                "document id {id:?} is not a valid file name"
            )));
        }
        Ok(self.docs_path.join(format!("{id}.json")))
    }

    /// All documents in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Document] {
        &self.documents
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Documents ranked by term-overlap count; see [`lexical::search`].
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Document> {
        lexical::search(&self.documents, query)
            .into_iter()
            .map(|s| s.document)
            .collect()
    }
}

async fn load_records(docs_path: &Path) -> Vec<Record> {
    let mut entries = match tokio::fs::read_dir(docs_path).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("failed to read {}: {e}", docs_path.display());
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("failed to list {}: {e}", docs_path.display());
                break;
            }
        };
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match read_record(&path).await {
            Ok(record) => records.push(record),
            Err(e) => tracing::error!("error loading document {}: {e}", path.display()),
        }
    }

    records.sort_by(|a, b| {
        (a.sequence.is_none(), a.sequence, &a.id).cmp(&(b.sequence.is_none(), b.sequence, &b.id))
    });
    records
}

async fn read_record(path: &Path) -> Result<Record, MemoryError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}
