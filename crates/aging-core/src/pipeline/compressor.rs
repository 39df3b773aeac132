use aging_memory::Document;
use aging_memory::document::split_sentences;

use super::terms::{extract_terms, relevance};
use crate::config::PipelineConfig;

/// Bounds the generator's context: drops weakly relevant documents, trims the
/// rest to their most relevant sentences and caps the document count.
#[derive(Debug, Clone)]
pub struct ContextCompressor {
    max_documents: usize,
    relevance_threshold: f64,
    max_sentences: usize,
}

impl Default for ContextCompressor {
    fn default() -> Self {
        Self {
            max_documents: 5,
            relevance_threshold: 0.1,
            max_sentences: 3,
        }
    }
}

impl ContextCompressor {
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            max_documents: config.max_context_documents,
            relevance_threshold: config.relevance_threshold,
            max_sentences: config.max_sentences,
        }
    }

    /// At most `max_documents` documents; never empty when `documents` is not.
    ///
    /// If no document reaches the relevance threshold the first
    /// `max_documents` inputs are returned unmodified.
    #[must_use]
    pub fn compress(&self, query: &str, documents: &[Document]) -> Vec<Document> {
        let query_terms = extract_terms(query);
        let mut kept = Vec::new();

        for doc in documents {
            if kept.len() >= self.max_documents {
                break;
            }
            if relevance(&query_terms, &doc.content) < self.relevance_threshold {
                continue;
            }

            let sentences = split_sentences(&doc.content);
            if sentences.len() > self.max_sentences {
                let mut ranked: Vec<(f64, &String)> = sentences
                    .iter()
                    .map(|s| (relevance(&query_terms, s), s))
                    .collect();
                ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
                let summary = ranked
                    .into_iter()
                    .take(self.max_sentences)
                    .map(|(_, s)| s.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                kept.push(Document::new(doc.id.clone(), summary, doc.metadata.clone()));
            } else {
                kept.push(doc.clone());
            }
        }

        if kept.is_empty() && !documents.is_empty() {
            tracing::debug!("no document passed the relevance threshold, keeping leading inputs");
            return documents.iter().take(self.max_documents).cloned().collect();
        }
        kept
    }
}
