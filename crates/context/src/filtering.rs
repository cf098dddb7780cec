//! History trimming for prompt construction.
//!
//! Long threads cannot go to the model wholesale. Three independent filters
//! trim a history, always favouring the most recent messages, and a
//! [`FilterProfile`] chains them in a fixed order: count, then tokens, then
//! role balance. Every filter preserves the original message order.

use biotutor_core::{ChatMessage, Role};

/// Flat per-message token overhead added on top of the content estimate.
const TOKENS_PER_MESSAGE: usize = 100;

/// Keep at most the `count` most recent messages.
pub fn filter_by_count(messages: &[ChatMessage], count: usize) -> Vec<ChatMessage> {
    let skip = messages.len().saturating_sub(count);
    messages[skip..].to_vec()
}

/// Keep as many of the most recent messages as fit in `max_tokens`.
///
/// Token counts are estimated at one token per four characters of content,
/// plus a flat per-message overhead. Messages are admitted newest first;
/// the first one that would overflow the budget stops the scan.
pub fn filter_by_tokens(messages: &[ChatMessage], max_tokens: usize) -> Vec<ChatMessage> {
    let mut kept = Vec::new();
    let mut total = 0usize;

    for msg in messages.iter().rev() {
        let size = msg.content.len().div_ceil(4) + TOKENS_PER_MESSAGE;
        if total + size > max_tokens {
            break;
        }
        kept.push(msg.clone());
        total += size;
    }

    kept.reverse();
    kept
}

/// Keep the last `user_count` student messages and the last `ai_count` tutor
/// messages, in their original conversation order.
pub fn filter_by_role(
    messages: &[ChatMessage],
    user_count: usize,
    ai_count: usize,
) -> Vec<ChatMessage> {
    let mut user_seen = 0usize;
    let mut ai_seen = 0usize;
    let mut keep = vec![false; messages.len()];

    for (i, msg) in messages.iter().enumerate().rev() {
        match msg.role {
            Role::User if user_seen < user_count => {
                keep[i] = true;
                user_seen += 1;
            }
            Role::Ai if ai_seen < ai_count => {
                keep[i] = true;
                ai_seen += 1;
            }
            _ => {}
        }
    }

    messages
        .iter()
        .zip(keep)
        .filter_map(|(msg, kept)| kept.then(|| msg.clone()))
        .collect()
}

/// A bundle of filter limits applied count → tokens → role.
#[derive(Debug, Clone, Copy)]
pub struct FilterProfile {
    pub max_messages: usize,
    pub max_tokens: usize,
    pub user_messages: usize,
    pub ai_messages: usize,
}

impl Default for FilterProfile {
    fn default() -> Self {
        Self {
            max_messages: 15,
            max_tokens: 6000,
            user_messages: 7,
            ai_messages: 7,
        }
    }
}

impl FilterProfile {
    /// The wider window used when summarizing a whole conversation.
    pub fn summary() -> Self {
        Self {
            max_messages: 30,
            max_tokens: 7000,
            user_messages: 15,
            ai_messages: 15,
        }
    }

    pub fn apply(&self, messages: &[ChatMessage]) -> Vec<ChatMessage> {
        if messages.is_empty() {
            return Vec::new();
        }
        let trimmed = filter_by_count(messages, self.max_messages);
        let trimmed = filter_by_tokens(&trimmed, self.max_tokens);
        filter_by_role(&trimmed, self.user_messages, self.ai_messages)
    }
}
