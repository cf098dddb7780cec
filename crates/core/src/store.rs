//! ContextStore trait — per-thread context persistence.
//!
//! The store is what makes a thread remember anything between turns. Loads
//! run through the lenient validation in [`crate::context`], so a corrupt
//! or legacy row degrades to an empty context instead of poisoning the
//! thread. Saves are treated as best-effort by callers: a failed save is
//! logged and the turn's response still goes out.

use crate::context::ConversationContext;
use crate::error::StoreError;
use crate::message::ThreadId;
use async_trait::async_trait;

/// The context persistence trait.
///
/// Implementations: SQLite, in-memory (for testing), none (no-op).
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "memory", "none").
    fn name(&self) -> &str;

    /// Load the context for a thread, `None` when the thread is new.
    async fn load(
        &self,
        thread_id: &ThreadId,
    ) -> std::result::Result<Option<ConversationContext>, StoreError>;

    /// Persist the context for a thread, replacing any previous value.
    async fn save(
        &self,
        thread_id: &ThreadId,
        context: &ConversationContext,
    ) -> std::result::Result<(), StoreError>;
}
