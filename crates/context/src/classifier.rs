//! Subject-domain classification for incoming queries.
//!
//! The tutor only answers A-Level biology questions. Deciding whether a query
//! is in scope takes one of two paths:
//!
//! - **Context path.** If the query leans on earlier turns ("tell me more
//!   about it") and the conversation already has a topic, the question is
//!   really about that topic. We check the topic against a small denylist of
//!   subjects students commonly confuse with biology terms ("DNS" vs "DNA",
//!   "domain" in networking vs taxonomy) and answer without a model call.
//! - **Model path.** Otherwise we ask the configured generator a yes/no
//!   question about the query itself.
//!
//! When the model path fails, the classifier falls back to its configured
//! `fail_open` answer rather than surfacing the error.

use std::sync::Arc;

use biotutor_core::{ConversationContext, TextGenerator};
use tracing::{debug, warn};

use crate::detector::has_contextual_reference;

/// Topics that sound adjacent to biology vocabulary but are not biology.
const NON_DOMAIN_TOPICS: &[&str] = &[
    "dns",
    "domain name system",
    "ip",
    "computer",
    "physics",
    "history",
    "mathematics",
    "literature",
    "politics",
    "economics",
    "geography",
    "art",
    "music",
];

/// Classifies queries as in or out of the biology domain.
pub struct DomainClassifier {
    generator: Arc<dyn TextGenerator>,
    fail_open: bool,
}

impl DomainClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>, fail_open: bool) -> Self {
        Self { generator, fail_open }
    }

    /// Returns true when `query` should be answered by the tutor.
    ///
    /// Never returns an error: a failed model call resolves to the
    /// configured `fail_open` value.
    pub async fn is_in_domain(&self, query: &str, context: &ConversationContext) -> bool {
        if has_contextual_reference(query) {
            if let Some(topic) = discussed_topic(context) {
                let verdict = Self::topic_in_domain(topic);
                debug!(topic, verdict, "classified contextual query from conversation topic");
                return verdict;
            }
        }

        let prompt = topic_check_prompt(query);
        match self.generator.generate(&prompt).await {
            Ok(generation) => {
                let answer = generation.content.trim().to_lowercase();
                answer.contains("yes")
            }
            Err(err) => {
                warn!(error = %err, fail_open = self.fail_open, "domain check failed, using fallback verdict");
                self.fail_open
            }
        }
    }

    /// Denylist substring check against a resolved conversation topic.
    fn topic_in_domain(topic: &str) -> bool {
        let topic = topic.to_lowercase();
        !NON_DOMAIN_TOPICS.iter().any(|t| topic.contains(t))
    }
}

/// The topic a contextual query is about, if the conversation has one.
///
/// Unlike [`ConversationContext::resolve_topic`] this deliberately ignores
/// `keyEntities`: an entity name alone is too weak a signal to skip the
/// model check on.
fn discussed_topic(context: &ConversationContext) -> Option<&str> {
    if !context.last_topic.is_empty() {
        return Some(&context.last_topic);
    }
    context.recent_topics.first().map(String::as_str)
}

fn topic_check_prompt(query: &str) -> String {
    format!(
        "You are a classifier for an A-Level biology tutoring assistant.\n\
         Determine if the following student message is about biology or could be \
         answered in a biology lesson.\n\n\
         Message: {query}\n\n\
         Respond with exactly \"yes\" or \"no\"."
    )
}
