//! Folding each turn back into the thread's conversation context.
//!
//! After a turn completes, the context gains the topic discussed. When the
//! pipeline already knows the topic (a resolved reference or a lexical hit)
//! it is recorded directly; otherwise a model extraction pulls the main
//! topic and entities out of the query. Either way the update never fails:
//! any error leaves the context exactly as it was.

use std::sync::Arc;
use std::sync::LazyLock;

use biotutor_core::{ConversationContext, TextGenerator};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

static META_TOPIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)summar(y|ize|ise)|recap|overview").unwrap());

/// True for topics that describe the conversation itself ("summary",
/// "recap") rather than subject matter. These must not enter the topic
/// list, or a later "tell me more about it" would resolve to them.
pub fn is_meta_topic(topic: &str) -> bool {
    META_TOPIC_RE.is_match(topic)
}

/// What the extraction model returns, in its wire spelling.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Extraction {
    main_topic: String,
    #[allow(dead_code)]
    subtopics: Vec<String>,
    entities: std::collections::BTreeMap<String, String>,
}

/// Maintains [`ConversationContext`] across turns.
pub struct ContextUpdater {
    generator: Arc<dyn TextGenerator>,
}

impl ContextUpdater {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Produce the context as it should be stored after this turn.
    ///
    /// With a known `topic`, records it directly (unless it is a meta-topic,
    /// in which case the context is returned unchanged). Without one, asks
    /// the model to extract a topic and entities from `query`; extraction
    /// failure also returns the context unchanged.
    pub async fn update(
        &self,
        context: &ConversationContext,
        query: &str,
        topic: Option<&str>,
    ) -> ConversationContext {
        let mut updated = context.clone();

        if let Some(topic) = topic {
            if is_meta_topic(topic) {
                debug!(topic, "meta-topic excluded from conversation context");
                return updated;
            }
            updated.record_topic(topic);
            return updated;
        }

        match self.extract(query).await {
            Some(extraction) if !extraction.main_topic.is_empty() => {
                updated.record_topic(&extraction.main_topic);
                updated.merge_entities(extraction.entities);
                updated
            }
            _ => updated,
        }
    }

    async fn extract(&self, query: &str) -> Option<Extraction> {
        let prompt = extraction_prompt(query);
        let generation = match self.generator.generate(&prompt).await {
            Ok(generation) => generation,
            Err(err) => {
                warn!(error = %err, "topic extraction failed, leaving context unchanged");
                return None;
            }
        };

        match parse_extraction(&generation.content) {
            Some(extraction) => Some(extraction),
            None => {
                warn!("topic extraction returned unparseable output");
                None
            }
        }
    }
}

fn extraction_prompt(query: &str) -> String {
    format!(
        "You are an AI assistant specializing in biology context analysis. Analyze the \
         following message and extract the main biology topics and entities mentioned. \
         Focus only on biology-related entities.\n\n\
         Message: \"{query}\"\n\n\
         Respond in the following JSON format:\n\
         {{\n\
         \x20 \"mainTopic\": \"The primary biology topic (if any)\",\n\
         \x20 \"subtopics\": [\"list\", \"of\", \"biology\", \"subtopics\"],\n\
         \x20 \"entities\": {{\n\
         \x20   \"entity1\": \"brief description\",\n\
         \x20   \"entity2\": \"brief description\"\n\
         \x20 }}\n\
         }}\n\n\
         If no biology topics are found, return empty values. Be concise and specific."
    )
}

/// Parse extraction output, tolerating prose around the JSON by slicing
/// from the first `{` to the last `}`.
fn parse_extraction(content: &str) -> Option<Extraction> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&content[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use biotutor_core::{Generation, ProviderError, MAX_RECENT_TOPICS};

    struct CannedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _prompt: &str) -> Result<Generation, ProviderError> {
            Ok(Generation::new(self.0))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _prompt: &str) -> Result<Generation, ProviderError> {
            Err(ProviderError::EmptyCompletion)
        }
    }

    #[test]
    fn meta_topics_are_recognized() {
        assert!(is_meta_topic("summary"));
        assert!(is_meta_topic("Summarise our chat"));
        assert!(is_meta_topic("a recap of enzymes"));
        assert!(is_meta_topic("overview"));
        assert!(!is_meta_topic("osmosis"));
        assert!(!is_meta_topic("cell division"));
    }

    #[tokio::test]
    async fn known_topic_is_recorded_directly() {
        let updater = ContextUpdater::new(Arc::new(FailingGenerator));
        let ctx = ConversationContext::empty();
        let updated = updater.update(&ctx, "what is osmosis", Some("osmosis")).await;
        assert_eq!(updated.last_topic, "osmosis");
        assert_eq!(updated.recent_topics, vec!["osmosis"]);
        assert!(updated.key_entities.is_empty());
    }

    #[tokio::test]
    async fn meta_topic_leaves_context_unchanged() {
        let updater = ContextUpdater::new(Arc::new(FailingGenerator));
        let mut ctx = ConversationContext::empty();
        ctx.record_topic("enzymes");
        let updated = updater
            .update(&ctx, "summarize our conversation", Some("summary"))
            .await;
        assert_eq!(updated, ctx);
    }

    #[tokio::test]
    async fn extraction_records_topic_and_merges_entities() {
        let updater = ContextUpdater::new(Arc::new(CannedGenerator(
            r#"{"mainTopic": "photosynthesis", "subtopics": ["light reactions"], "entities": {"chlorophyll": "light-absorbing pigment"}}"#,
        )));
        let mut ctx = ConversationContext::empty();
        ctx.key_entities.insert("ATP".into(), "energy currency".into());

        let updated = updater.update(&ctx, "how do plants make food", None).await;
        assert_eq!(updated.last_topic, "photosynthesis");
        assert_eq!(updated.recent_topics, vec!["photosynthesis"]);
        assert_eq!(updated.key_entities.len(), 2);
        assert_eq!(updated.key_entities["chlorophyll"], "light-absorbing pigment");
    }

    #[tokio::test]
    async fn extraction_tolerates_surrounding_prose() {
        let updater = ContextUpdater::new(Arc::new(CannedGenerator(
            "Sure! Here is the analysis:\n{\"mainTopic\": \"mitosis\", \"subtopics\": [], \"entities\": {}}\nHope that helps.",
        )));
        let updated = updater
            .update(&ConversationContext::empty(), "cells splitting", None)
            .await;
        assert_eq!(updated.last_topic, "mitosis");
    }

    #[tokio::test]
    async fn empty_main_topic_leaves_context_unchanged() {
        let updater = ContextUpdater::new(Arc::new(CannedGenerator(
            r#"{"mainTopic": "", "subtopics": [], "entities": {}}"#,
        )));
        let mut ctx = ConversationContext::empty();
        ctx.record_topic("enzymes");
        let updated = updater.update(&ctx, "hello there", None).await;
        assert_eq!(updated, ctx);
    }

    #[tokio::test]
    async fn extraction_failure_leaves_context_unchanged() {
        let updater = ContextUpdater::new(Arc::new(FailingGenerator));
        let mut ctx = ConversationContext::empty();
        ctx.record_topic("enzymes");
        let updated = updater.update(&ctx, "how do plants make food", None).await;
        assert_eq!(updated, ctx);

        let garbled = ContextUpdater::new(Arc::new(CannedGenerator("not json at all")));
        let updated = garbled.update(&ctx, "how do plants make food", None).await;
        assert_eq!(updated, ctx);
    }

    #[tokio::test]
    async fn topic_cap_holds_across_updates() {
        let updater = ContextUpdater::new(Arc::new(FailingGenerator));
        let mut ctx = ConversationContext::empty();
        for topic in ["a", "b", "c", "d", "e", "f"] {
            ctx = updater.update(&ctx, "q", Some(topic)).await;
        }
        assert_eq!(ctx.recent_topics.len(), MAX_RECENT_TOPICS);
        assert_eq!(ctx.recent_topics[0], "f");
        assert_eq!(ctx.last_topic, "f");
    }
}
