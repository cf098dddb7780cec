//! No-op store — disables context persistence entirely.

use async_trait::async_trait;
use biotutor_core::{ContextStore, ConversationContext, StoreError, ThreadId};

/// A store that remembers nothing. Every thread starts fresh.
pub struct NoopStore;

#[async_trait]
impl ContextStore for NoopStore {
    fn name(&self) -> &str {
        "none"
    }

    async fn load(
        &self,
        _thread_id: &ThreadId,
    ) -> Result<Option<ConversationContext>, StoreError> {
        Ok(None)
    }

    async fn save(
        &self,
        _thread_id: &ThreadId,
        _context: &ConversationContext,
    ) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn saves_vanish() {
        let store = NoopStore;
        let thread = ThreadId::from("t1");
        let mut ctx = ConversationContext::empty();
        ctx.record_topic("osmosis");

        store.save(&thread, &ctx).await.unwrap();
        assert!(store.load(&thread).await.unwrap().is_none());
    }
}
