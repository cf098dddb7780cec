//! Conversation-context machinery for the biotutor engine.
//!
//! This crate owns everything that makes "tell me more about it" work:
//!
//! - [`detector`] — spots back-references ("it", "the topic", "earlier") in a
//!   message without any model call.
//! - [`resolver`] — turns a back-reference into a concrete topic and rewrites
//!   the query around it.
//! - [`classifier`] — decides whether a query belongs to the tutor's subject
//!   domain, short-circuiting on conversation context where possible.
//! - [`updater`] — folds each turn's topic and entities back into the
//!   thread's [`biotutor_core::ConversationContext`].
//! - [`filtering`] — trims message history to fit a prompt window.
//! - [`format`] — renders history and context into prompt text.
//!
//! None of the operations here ever surface an error to the caller; failures
//! degrade to documented defaults and are logged.

pub mod classifier;
pub mod detector;
pub mod filtering;
pub mod format;
pub mod resolver;
pub mod updater;

pub use classifier::DomainClassifier;
pub use detector::has_contextual_reference;
pub use filtering::FilterProfile;
pub use format::{domain_topics_in, format_context_block, format_recent_messages};
pub use resolver::{resolve_and_rewrite, rewrite_phrase};
pub use updater::{is_meta_topic, ContextUpdater};
