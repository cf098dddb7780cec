//! Contextual reference resolution and query rewriting.
//!
//! Once a turn is known to reference earlier conversation ("quiz me on
//! that"), the resolver replaces the working query with an explicit one
//! built around the resolved topic, so retrieval and generation see a
//! self-contained request. The caller's wording is preserved on the turn
//! state and restored after generation.

use biotutor_core::{ResponseType, TurnState};
use tracing::debug;

/// The explicit query a contextual reference rewrites to, given the routed
/// response type and the resolved topic.
pub fn rewrite_phrase(response_type: ResponseType, topic: &str) -> String {
    match response_type {
        ResponseType::Quiz => format!("Create a quiz about {topic}"),
        ResponseType::ContentCollector => format!("Tell me about {topic}"),
        ResponseType::ExamQuestion => format!("Find exam questions about {topic}"),
        ResponseType::MarkScheme => format!("Find the mark scheme about {topic}"),
        ResponseType::Teach | ResponseType::Summary => format!("Teach me about {topic}"),
    }
}

/// Resolve a contextual query against the turn's conversation context and
/// rewrite it in place.
///
/// Returns the resolved topic when a rewrite happened. No-op when the turn
/// carries no contextual reference or the context has nothing to resolve
/// against.
pub fn resolve_and_rewrite(state: &mut TurnState, response_type: ResponseType) -> Option<String> {
    if !state.has_contextual_reference {
        return None;
    }
    let topic = state.context.resolve_topic()?.to_string();
    let rewritten = rewrite_phrase(response_type, &topic);
    debug!(topic = %topic, query = %rewritten, "rewrote contextual query");
    state.rewrite_query(rewritten);
    Some(topic)
}
