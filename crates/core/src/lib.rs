//! # Biotutor Core
//!
//! Domain types, traits, and error definitions for the biotutor conversation
//! engine. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator the engine talks to is defined as a trait here.
//! Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod context;
pub mod error;
pub mod message;
pub mod provider;
pub mod retrieval;
pub mod routing;
pub mod state;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use context::{ConversationContext, MAX_RECENT_TOPICS};
pub use error::{Error, ProviderError, Result, RetrievalError, StoreError};
pub use message::{ChatMessage, Role, ThreadId};
pub use provider::{Generation, TextGenerator};
pub use retrieval::{Document, DocumentRetriever};
pub use routing::{ResponseType, RetrievalTarget, RoutingDecision};
pub use state::TurnState;
pub use store::ContextStore;
