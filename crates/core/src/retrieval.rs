//! DocumentRetriever trait — the abstraction over document sources.
//!
//! Retrieval backends (vector stores, static corpora) implement this. The
//! engine treats a failed call and an empty result the same way, so
//! implementations are free to error loudly; degradation happens at the
//! call site, not here.

use crate::error::RetrievalError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A retrieved document fragment.
///
/// Serialized field names match the wire form (`pageContent`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The document text
    pub page_content: String,

    /// Source metadata (file name, page number, corpus tags)
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Attach one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// The document retrieval trait.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// A human-readable name for this retriever (e.g., "content", "exam-papers").
    fn name(&self) -> &str;

    /// Fetch the documents most relevant to the query.
    async fn relevant_documents(
        &self,
        query: &str,
    ) -> std::result::Result<Vec<Document>, RetrievalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_wire_form_uses_page_content() {
        let doc = Document::new("Osmosis is the diffusion of water.")
            .with_metadata("page", serde_json::json!(12));
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("pageContent").is_some());
        assert_eq!(json["metadata"]["page"], 12);
    }

    #[test]
    fn empty_metadata_is_omitted() {
        let json = serde_json::to_value(Document::new("text")).unwrap();
        assert!(json.get("metadata").is_none());
    }
}
