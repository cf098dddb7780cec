//! In-memory store — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use biotutor_core::{ContextStore, ConversationContext, StoreError, ThreadId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps contexts in a map behind an `RwLock`; nothing survives a restart.
pub struct InMemoryStore {
    rows: Arc<RwLock<HashMap<ThreadId, ConversationContext>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// How many threads have saved contexts.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Option<ConversationContext>, StoreError> {
        Ok(self.rows.read().await.get(thread_id).cloned())
    }

    async fn save(
        &self,
        thread_id: &ThreadId,
        context: &ConversationContext,
    ) -> Result<(), StoreError> {
        self.rows
            .write()
            .await
            .insert(thread_id.clone(), context.clone());
        Ok(())
    }
}
