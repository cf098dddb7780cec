//! A static in-memory retriever for tests and offline runs.
//!
//! Production retrieval sits behind [`DocumentRetriever`] and is provided by
//! external adapters; this one serves a fixed corpus with a crude word
//! overlap match so the rest of the pipeline can run without any backend.

use async_trait::async_trait;
use biotutor_core::{Document, DocumentRetriever, RetrievalError};

/// Serves documents from a fixed in-memory corpus.
pub struct StaticRetriever {
    name: String,
    documents: Vec<Document>,
    /// Most documents returned per query
    limit: usize,
}

impl StaticRetriever {
    pub fn new(name: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            name: name.into(),
            documents,
            limit: 4,
        }
    }

    /// A retriever with nothing in it; every query returns no documents.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl DocumentRetriever for StaticRetriever {
    fn name(&self) -> &str {
        &self.name
    }

    async fn relevant_documents(&self, query: &str) -> Result<Vec<Document>, RetrievalError> {
        let lower = query.to_lowercase();
        // Words under 4 chars ("is", "the", "dna" stays out too but lives
        // inside longer queries often enough) add noise, skip them.
        let terms: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() >= 4)
            .collect();

        let matched: Vec<Document> = self
            .documents
            .iter()
            .filter(|doc| {
                let content = doc.page_content.to_lowercase();
                terms.iter().any(|term| content.contains(term))
            })
            .take(self.limit)
            .cloned()
            .collect();

        Ok(matched)
    }
}
