use crate::document::{Document, DocumentMetadata};

/// Fixed set of sample PubMed abstracts used to enrich a fresh knowledge base.
#[derive(Debug, Clone, Copy, Default)]
pub struct PubMedSampleLoader;

struct Abstract {
    pmid: &'static str,
    title: &'static str,
    authors: &'static str,
    year: &'static str,
    text: &'static str,
}

const SAMPLES: &[Abstract] = &[
    Abstract {
        pmid: "12345678",
        title: "Cellular Senescence in Aging",
        authors: "Smith J, Johnson A",
        year: "2023",
        text: "Recent studies have shown that cellular senescence is a significant contributor to \
               aging and age-related diseases. Senescent cells accumulate with age and secrete \
               inflammatory factors that can promote tissue dysfunction.",
    },
    Abstract {
        pmid: "87654321",
        title: "Mitochondrial Function and Aging",
        authors: "Brown R, Davis T",
        year: "2022",
        text: "Mitochondrial dysfunction is implicated in aging processes. This study demonstrates \
               that improving mitochondrial function through targeted interventions can extend \
               lifespan in model organisms.",
    },
    Abstract {
        pmid: "23456789",
        title: "Rapamycin as an Aging Intervention",
        authors: "Wilson E, Garcia M",
        year: "2023",
        text: "Rapamycin inhibits the mTOR pathway and has been shown to extend lifespan in \
               multiple species. This review discusses the potential mechanisms and challenges \
               of using rapamycin for aging interventions in humans.",
    },
];

impl PubMedSampleLoader {
    #[must_use]
    pub fn load(&self) -> Vec<Document> {
        let documents: Vec<Document> = SAMPLES
            .iter()
            .map(|a| {
                let mut metadata = DocumentMetadata::with_source("PubMed").title(a.title);
                metadata.author = Some(a.authors.to_owned());
                metadata.year = Some(a.year.to_owned());
                Document::new(format!("pmid_{}", a.pmid), a.text, metadata)
            })
            .collect();
        tracing::info!(documents = documents.len(), "loaded sample PubMed abstracts");
        documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_abstracts_with_bibliographic_metadata() {
        let docs = PubMedSampleLoader.load();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].id, "pmid_12345678");
        assert_eq!(docs[1].metadata.year.as_deref(), Some("2022"));
        assert_eq!(docs[2].metadata.title.as_deref(), Some("Rapamycin as an Aging Intervention"));
        assert!(docs.iter().all(|d| d.metadata.source.as_deref() == Some("PubMed")));
    }

    #[test]
    fn authors_serialize_under_author_key() {
        let doc = &PubMedSampleLoader.load()[0];
        let value = serde_json::to_value(&doc.metadata).unwrap();
        assert_eq!(value["author"], "Smith J, Johnson A");
    }
}
