//! Message and thread domain types.
//!
//! These are the core value objects that flow through the entire system:
//! the student sends a message → the router classifies it → a generator
//! produces the tutor's reply → both land in the thread's history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    /// Mint a fresh thread id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Use the given id when present, otherwise mint one.
    pub fn ensure(id: Option<&str>) -> Self {
        match id {
            Some(s) if !s.trim().is_empty() => Self::from(s),
            _ => Self::new(),
        }
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The student
    User,
    /// The tutor
    Ai,
}

/// A single message in a thread.
///
/// Timestamps default to "now" on deserialization so histories supplied as
/// bare `{role, content}` pairs stay accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new student message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new tutor message.
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = ChatMessage::user("What is osmosis?");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "What is osmosis?");
    }

    #[test]
    fn bare_role_content_pair_deserializes() {
        let msg: ChatMessage = serde_json::from_str(r#"{"role":"ai","content":"hi"}"#).unwrap();
        assert_eq!(msg.role, Role::Ai);
        assert_eq!(msg.content, "hi");
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = ChatMessage::user("Test message");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.content, "Test message");
        assert_eq!(deserialized.role, Role::User);
    }

    #[test]
    fn thread_id_converts_from_str() {
        let id = ThreadId::from("thread-7");
        assert_eq!(id.as_str(), "thread-7");
        assert_eq!(ThreadId::from("thread-7"), id);
    }

    #[test]
    fn ensure_mints_when_blank() {
        let a = ThreadId::ensure(Some("thread-9"));
        assert_eq!(a.as_str(), "thread-9");

        let b = ThreadId::ensure(Some("   "));
        let c = ThreadId::ensure(None);
        assert_ne!(b.as_str(), "");
        assert_ne!(b, c);
    }
}
