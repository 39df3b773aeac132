use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known metadata fields plus an open extension bag.
///
/// Deserialization never fails on value types: scalars and flat arrays in the
/// well-known fields are coerced to strings, anything else lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl DocumentMetadata {
    #[must_use]
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Source label for display, with a caller-supplied fallback.
    #[must_use]
    pub fn source_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.source.as_deref().unwrap_or(fallback)
    }
}

impl From<Value> for DocumentMetadata {
    fn from(value: Value) -> Self {
        let mut extra: BTreeMap<String, Value> = match value {
            Value::Null => return Self::default(),
            Value::Object(map) => map.into_iter().collect(),
            other => BTreeMap::from([("value".to_owned(), other)]),
        };
        let author = if extra.get("author").is_some_and(|v| !v.is_null()) {
            take_text(&mut extra, "author")
        } else {
            extra.remove("author");
            take_text(&mut extra, "authors")
        };
        Self {
            source: take_text(&mut extra, "source"),
            title: take_text(&mut extra, "title"),
            category: take_text(&mut extra, "category"),
            author,
            year: take_text(&mut extra, "year"),
            extra,
        }
    }
}

/// Remove `key` when its value reads as text; leave it in place otherwise.
fn take_text(fields: &mut BTreeMap<String, Value>, key: &str) -> Option<String> {
    let text = match fields.get(key)? {
        Value::Null => None,
        value => Some(as_text(value)?),
    };
    fields.remove(key);
    text
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(_) | Value::Object(_) | Value::Null => None,
                scalar => as_text(scalar),
            })
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(", ")),
        Value::Null | Value::Object(_) => None,
    }
}

/// A stored knowledge snippet. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, content: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata,
        }
    }
}

/// Ranking-stage pairing of a document and a stage-local score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_roundtrip_keeps_extra_fields() {
        let json = r#"{"source":"PubMed","title":"T","chunk":3,"journal":"Cell"}"#;
        let meta: DocumentMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.source.as_deref(), Some("PubMed"));
        assert_eq!(meta.title.as_deref(), Some("T"));
        assert_eq!(meta.extra.get("chunk"), Some(&serde_json::json!(3)));
        assert_eq!(meta.extra.get("journal"), Some(&serde_json::json!("Cell")));

        let out = serde_json::to_value(&meta).unwrap();
        assert_eq!(out["chunk"], 3);
        assert!(out.get("category").is_none());
    }

    #[test]
    fn authors_alias_and_numeric_year() {
        let json = r#"{"authors":"Smith J","year":2023}"#;
        let meta: DocumentMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.author.as_deref(), Some("Smith J"));
        assert_eq!(meta.year.as_deref(), Some("2023"));
    }

    #[test]
    fn list_and_numeric_fields_are_coerced() {
        let json = r#"{"authors":["Smith J","Doe A"],"title":42,"category":true}"#;
        let meta: DocumentMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.author.as_deref(), Some("Smith J, Doe A"));
        assert_eq!(meta.title.as_deref(), Some("42"));
        assert_eq!(meta.category.as_deref(), Some("true"));
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn author_and_authors_together_keep_both() {
        let json = r#"{"author":"Smith J","authors":["Smith J","Doe A"]}"#;
        let meta: DocumentMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.author.as_deref(), Some("Smith J"));
        assert_eq!(meta.extra["authors"], serde_json::json!(["Smith J", "Doe A"]));
    }

    #[test]
    fn uncoercible_values_move_to_extra() {
        let json = r#"{"source":{"db":"PubMed"},"title":[["nested"]],"year":null}"#;
        let meta: DocumentMetadata = serde_json::from_str(json).unwrap();
        assert!(meta.source.is_none());
        assert!(meta.title.is_none());
        assert!(meta.year.is_none());
        assert_eq!(meta.extra["source"], serde_json::json!({"db": "PubMed"}));
        assert_eq!(meta.extra["title"], serde_json::json!([["nested"]]));
    }

    #[test]
    fn non_object_metadata_is_kept_as_value() {
        let meta: DocumentMetadata = serde_json::from_str(r#""free text""#).unwrap();
        assert_eq!(meta.extra["value"], "free text");
        let meta: DocumentMetadata = serde_json::from_str("null").unwrap();
        assert_eq!(meta, DocumentMetadata::default());
    }

    #[test]
    fn document_without_metadata_deserializes() {
        let doc: Document = serde_json::from_str(r#"{"id":"a","content":"c"}"#).unwrap();
        assert_eq!(doc.metadata, DocumentMetadata::default());
    }

    #[test]
    fn source_or_falls_back() {
        let meta = DocumentMetadata::default();
        assert_eq!(meta.source_or("Aging Research"), "Aging Research");
        let meta = DocumentMetadata::with_source("Lab");
        assert_eq!(meta.source_or("Aging Research"), "Lab");
    }
}
