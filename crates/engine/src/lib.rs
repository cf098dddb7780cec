//! The biotutor turn pipeline.
//!
//! [`TutorEngine`] is the single entry point: give it a thread id, the
//! student's message, and the thread's history, and it returns the tutor's
//! reply together with the updated turn state. Routing, domain gating,
//! retrieval, and generation all happen behind that one call, and none of
//! them can fail it — every stage degrades to a documented fallback.

pub mod engine;
pub mod generators;
pub mod prompts;
pub mod retriever;

pub use engine::{TurnOutcome, TutorEngine};
pub use generators::{generator_for, ResponseGenerator};
pub use retriever::StaticRetriever;
