//! Per-turn conversation state.

use crate::context::ConversationContext;
use crate::message::{ChatMessage, ThreadId};
use crate::retrieval::Document;
use crate::routing::ResponseType;
use serde::{Deserialize, Serialize};

/// Everything one turn of the pipeline reads and writes.
///
/// Built fresh for each incoming message, threaded through routing,
/// retrieval, and generation, then folded back into the stored context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    /// Which thread this turn belongs to
    pub thread_id: ThreadId,

    /// History as supplied by the caller, oldest first
    #[serde(default)]
    pub messages: Vec<ChatMessage>,

    /// The query driving this turn; may be rewritten during resolution
    pub query: String,

    /// The caller's wording, kept while `query` holds a rewrite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_query: Option<String>,

    /// Whether the query refers back to earlier conversation
    #[serde(default)]
    pub has_contextual_reference: bool,

    /// Routed response type, once routing has run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<ResponseType>,

    /// Retrieved subject reference documents
    #[serde(default)]
    pub documents: Vec<Document>,

    /// Retrieved exam paper documents
    #[serde(default)]
    pub exam_documents: Vec<Document>,

    /// Accumulated conversation context for the thread
    #[serde(default)]
    pub context: ConversationContext,
}

impl TurnState {
    /// Start a turn for a thread with the incoming query.
    pub fn new(thread_id: ThreadId, query: impl Into<String>) -> Self {
        Self {
            thread_id,
            messages: Vec::new(),
            query: query.into(),
            original_query: None,
            has_contextual_reference: false,
            response_type: None,
            documents: Vec::new(),
            exam_documents: Vec::new(),
            context: ConversationContext::empty(),
        }
    }

    /// Attach prior history.
    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// Attach the thread's accumulated context.
    pub fn with_context(mut self, context: ConversationContext) -> Self {
        self.context = context;
        self
    }

    /// Swap in a rewritten query, keeping the caller's wording. Only the
    /// first rewrite records the original; later rewrites refine the
    /// working query without losing it.
    pub fn rewrite_query(&mut self, rewritten: impl Into<String>) {
        if self.original_query.is_none() {
            self.original_query = Some(std::mem::take(&mut self.query));
        }
        self.query = rewritten.into();
    }

    /// Put the caller's wording back after generation.
    pub fn restore_query(&mut self) {
        if let Some(original) = self.original_query.take() {
            self.query = original;
        }
    }
}
