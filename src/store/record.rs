//! Record types held by the store.

use serde::{Deserialize, Serialize};

/// Free-form metadata attached to a record.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Characters kept in a list preview unless configured otherwise.
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

/// A stored document.
///
/// `vector.len()` always equals the owning store's dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub text: String,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// A write request for [`VectorStore::put`](super::VectorStore::put).
///
/// Without a vector the store embeds `text` itself.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub id: String,
    pub text: String,
    pub vector: Option<Vec<f32>>,
    pub metadata: Metadata,
}

impl NewRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            vector: None,
            metadata: Metadata::new(),
        }
    }

    /// Supply a pre-computed vector instead of embedding the text.
    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = Some(vector);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add one metadata entry.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Inspection view of a record: truncated text, no vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
}

impl RecordSummary {
    pub fn from_record(record: &Record, preview_chars: usize) -> Self {
        Self {
            id: record.id.clone(),
            text: preview(&record.text, preview_chars),
            metadata: record.metadata.clone(),
        }
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
///
/// Counts Unicode scalar values and never splits one.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
