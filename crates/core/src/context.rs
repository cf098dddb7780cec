//! Accumulated conversation context for a thread.
//!
//! The context is what lets "tell me more about it" mean something: it
//! carries the topics and entities discussed so far, so later turns can
//! resolve references back to them. It is persisted per thread and must
//! survive malformed or legacy payloads, so construction from JSON is
//! deliberately lenient: every field coerces to a safe default instead of
//! failing the load.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cap on how many recent topics a context retains.
pub const MAX_RECENT_TOPICS: usize = 5;

/// Rolling memory of what a thread has discussed.
///
/// Serialized field names match the persisted wire form (`recentTopics`,
/// `keyEntities`, `lastTopic`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversationContext {
    /// Topics in discussion order, most recent first, at most
    /// [`MAX_RECENT_TOPICS`] entries. Duplicates are kept: recurrence of a
    /// topic is signal, not noise.
    pub recent_topics: Vec<String>,

    /// Entity name → short description. Sorted map so "first entity" is
    /// deterministic.
    pub key_entities: BTreeMap<String, String>,

    /// The single most recently discussed topic; empty string means unset.
    pub last_topic: String,
}

impl ConversationContext {
    /// An empty context, the safe default for new or unrecoverable threads.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a context from an arbitrary JSON value, coercing anything
    /// malformed to its default. A null, a string, a context with
    /// `recentTopics: 42` — all come back as valid contexts rather than
    /// errors. This is the single validation boundary; code past it trusts
    /// the invariant.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::empty();
        };

        let mut recent_topics: Vec<String> = obj
            .get("recentTopics")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        recent_topics.truncate(MAX_RECENT_TOPICS);

        let key_entities: BTreeMap<String, String> = obj
            .get("keyEntities")
            .and_then(|v| v.as_object())
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        let last_topic = obj
            .get("lastTopic")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Self {
            recent_topics,
            key_entities,
            last_topic,
        }
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.recent_topics.is_empty() && self.key_entities.is_empty() && self.last_topic.is_empty()
    }

    /// Record a freshly discussed topic: prepend to the recent list, keep
    /// the cap, and mark it as the last topic. No deduplication.
    pub fn record_topic(&mut self, topic: &str) {
        self.recent_topics.insert(0, topic.to_string());
        self.recent_topics.truncate(MAX_RECENT_TOPICS);
        self.last_topic = topic.to_string();
    }

    /// Merge extracted entities in; new descriptions overwrite old ones
    /// under the same name.
    pub fn merge_entities<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, description) in entities {
            self.key_entities.insert(name, description);
        }
    }

    /// The topic a contextual reference most plausibly points at.
    ///
    /// Priority: `lastTopic`, else the most recent topic, else the first
    /// key of `keyEntities`, else nothing.
    pub fn resolve_topic(&self) -> Option<&str> {
        if !self.last_topic.is_empty() {
            return Some(&self.last_topic);
        }
        if let Some(topic) = self.recent_topics.first() {
            return Some(topic);
        }
        self.key_entities.keys().next().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_becomes_empty_context() {
        let ctx = ConversationContext::from_value(&serde_json::Value::Null);
        assert!(ctx.is_empty());
    }

    #[test]
    fn non_object_becomes_empty_context() {
        let ctx = ConversationContext::from_value(&json!("not a context"));
        assert!(ctx.is_empty());
    }

    #[test]
    fn missing_fields_coerce_to_defaults() {
        let ctx = ConversationContext::from_value(&json!({ "lastTopic": "osmosis" }));
        assert!(ctx.recent_topics.is_empty());
        assert!(ctx.key_entities.is_empty());
        assert_eq!(ctx.last_topic, "osmosis");
    }

    #[test]
    fn mistyped_fields_coerce_to_defaults() {
        let ctx = ConversationContext::from_value(&json!({
            "recentTopics": 42,
            "keyEntities": ["not", "a", "map"],
            "lastTopic": { "nested": true },
        }));
        assert!(ctx.is_empty());
    }

    #[test]
    fn non_string_array_entries_are_dropped() {
        let ctx = ConversationContext::from_value(&json!({
            "recentTopics": ["mitosis", 7, null, "meiosis"],
            "keyEntities": { "DNA": "genetic material", "count": 3 },
            "lastTopic": "mitosis",
        }));
        assert_eq!(ctx.recent_topics, vec!["mitosis", "meiosis"]);
        assert_eq!(ctx.key_entities.len(), 1);
        assert_eq!(ctx.key_entities["DNA"], "genetic material");
    }

    #[test]
    fn oversized_topic_list_is_capped_on_ingest() {
        let ctx = ConversationContext::from_value(&json!({
            "recentTopics": ["a", "b", "c", "d", "e", "f", "g"],
        }));
        assert_eq!(ctx.recent_topics.len(), MAX_RECENT_TOPICS);
        assert_eq!(ctx.recent_topics[0], "a");
    }

    #[test]
    fn record_topic_prepends_and_caps() {
        let mut ctx = ConversationContext::empty();
        for topic in ["a", "b", "c", "d", "e", "f"] {
            ctx.record_topic(topic);
        }
        assert_eq!(ctx.recent_topics, vec!["f", "e", "d", "c", "b"]);
        assert_eq!(ctx.last_topic, "f");
    }

    #[test]
    fn record_topic_keeps_duplicates() {
        let mut ctx = ConversationContext::empty();
        ctx.record_topic("photosynthesis");
        ctx.record_topic("photosynthesis");
        assert_eq!(ctx.recent_topics, vec!["photosynthesis", "photosynthesis"]);
    }

    #[test]
    fn resolve_prefers_last_topic() {
        let mut ctx = ConversationContext::empty();
        ctx.recent_topics = vec!["enzymes".into()];
        ctx.key_entities.insert("ATP".into(), "energy currency".into());
        ctx.last_topic = "osmosis".into();
        assert_eq!(ctx.resolve_topic(), Some("osmosis"));
    }

    #[test]
    fn resolve_falls_back_to_recent_then_entities() {
        let mut ctx = ConversationContext::empty();
        ctx.recent_topics = vec!["enzymes".into()];
        ctx.key_entities.insert("ATP".into(), "energy currency".into());
        assert_eq!(ctx.resolve_topic(), Some("enzymes"));

        ctx.recent_topics.clear();
        assert_eq!(ctx.resolve_topic(), Some("ATP"));
    }

    #[test]
    fn resolve_on_entities_only() {
        let mut ctx = ConversationContext::empty();
        ctx.key_entities.insert("Z".into(), "d".into());
        assert_eq!(ctx.resolve_topic(), Some("Z"));
    }

    #[test]
    fn resolve_on_empty_is_none() {
        assert_eq!(ConversationContext::empty().resolve_topic(), None);
    }

    #[test]
    fn wire_form_uses_camel_case() {
        let mut ctx = ConversationContext::empty();
        ctx.record_topic("digestion");
        let json = serde_json::to_value(&ctx).unwrap();
        assert!(json.get("recentTopics").is_some());
        assert!(json.get("keyEntities").is_some());
        assert_eq!(json["lastTopic"], "digestion");
    }
}
