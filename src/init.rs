use std::path::{Path, PathBuf};

use aging_core::config::Config;
use aging_memory::document::{DocumentLoader, JsonLoader, PubMedSampleLoader, TextLoader};
use aging_memory::{Document, DocumentStore};

#[derive(Debug, Default)]
pub struct InitOptions {
    pub kb_path: Option<PathBuf>,
    pub sample_json: Option<PathBuf>,
    pub text: Vec<PathBuf>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitReport {
    pub added: usize,
    pub skipped: usize,
    pub total: usize,
}

/// Open (and seed) the store, then ingest optional files and the PubMed samples.
///
/// An unreadable input file is logged and skipped; it never aborts initialization.
pub async fn run(config: &Config, options: &InitOptions) -> InitReport {
    let path = options
        .kb_path
        .clone()
        .unwrap_or_else(|| config.knowledge.resolved_path());
    let mut store = DocumentStore::open(&path).await;
    let mut report = InitReport::default();

    if let Some(json) = &options.sample_json {
        load_into(&mut store, &JsonLoader::default(), json, &mut report).await;
    }
    for text in &options.text {
        load_into(&mut store, &TextLoader::default(), text, &mut report).await;
    }
    ingest(&mut store, PubMedSampleLoader.load(), &mut report).await;

    report.total = store.len();
    tracing::info!(
        path = %store.path().display(),
        added = report.added,
        skipped = report.skipped,
        total = report.total,
        "knowledge base initialized"
    );
    report
}

async fn load_into(
    store: &mut DocumentStore,
    loader: &dyn DocumentLoader,
    path: &Path,
    report: &mut InitReport,
) {
    match loader.load(path).await {
        Ok(documents) => ingest(store, documents, report).await,
        Err(e) => tracing::error!("failed to load {}: {e}", path.display()),
    }
}

async fn ingest(store: &mut DocumentStore, documents: Vec<Document>, report: &mut InitReport) {
    for doc in documents {
        if store.contains(&doc.id) {
            report.skipped += 1;
            continue;
        }
        match store.add(doc.content, doc.metadata, Some(doc.id)).await {
            Ok(_) => report.added += 1,
            Err(e) => {
                tracing::warn!("skipping document: {e}");
                report.skipped += 1;
            }
        }
    }
}
