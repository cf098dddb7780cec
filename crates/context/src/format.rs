//! Rendering history and context into prompt text.

use biotutor_core::{ChatMessage, ConversationContext, Role};

/// Biology vocabulary used for cheap lexical topic detection.
const DOMAIN_TERMS: &[&str] = &[
    "photosynthesis",
    "respiration",
    "cell",
    "dna",
    "rna",
    "protein",
    "enzyme",
    "metabolism",
    "ecology",
    "evolution",
    "genetics",
    "chromosome",
    "mitosis",
    "meiosis",
    "inheritance",
    "taxonomy",
    "biodiversity",
    "ecosystem",
    "homeostasis",
    "hormone",
    "neuron",
    "muscle",
    "digestion",
    "circulation",
    "immunity",
    "reproduction",
];

/// The first domain term appearing in `text`, scanned in vocabulary order.
/// A case-insensitive substring match is enough here: this feeds topic
/// recording, not classification.
pub fn domain_topics_in(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    DOMAIN_TERMS.iter().find(|term| lower.contains(*term)).copied()
}

/// Render the most recent `count` messages as "Student:"/"Tutor:" lines.
pub fn format_recent_messages(messages: &[ChatMessage], count: usize) -> String {
    let skip = messages.len().saturating_sub(count);
    messages[skip..]
        .iter()
        .map(|msg| {
            let speaker = match msg.role {
                Role::User => "Student",
                Role::Ai => "Tutor",
            };
            format!("{speaker}: {}", msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the conversation context as a prompt block.
///
/// Returns an empty string for an empty context so callers can splice the
/// result in unconditionally. A non-empty block carries an instruction
/// telling the model what pronouns in the query most likely point at.
pub fn format_context_block(context: &ConversationContext) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !context.recent_topics.is_empty() {
        parts.push(format!(
            "Recent topics discussed: {}.",
            context.recent_topics.join(", ")
        ));
    }

    if !context.key_entities.is_empty() {
        let entities = context
            .key_entities
            .iter()
            .map(|(name, desc)| {
                if desc.is_empty() {
                    format!("{name} (concept)")
                } else {
                    format!("{name} ({desc})")
                }
            })
            .collect::<Vec<_>>()
            .join("; ");
        parts.push(format!("Key biology concepts: {entities}."));
    }

    if !context.last_topic.is_empty() {
        parts.push(format!(
            "The most recent primary topic was: {}.",
            context.last_topic
        ));
    }

    if let Some(referent) = context.resolve_topic() {
        parts.push(format!(
            "If the user query includes words like \"this\", \"it\", \"that\", \"these\", \
             \"the topic\", etc., they are likely referring to \"{referent}\" or one of the \
             recent topics."
        ));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("CONVERSATION CONTEXT:\n{}\n", parts.join("\n"))
    }
}
