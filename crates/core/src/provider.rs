//! TextGenerator trait — the abstraction over LLM backends.
//!
//! A TextGenerator takes one prompt string and returns one completed
//! response. Routing, classification, extraction, and the response
//! generators all speak to the model through this seam, so a scripted mock
//! slots in anywhere a real backend would.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A completed model response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    /// The generated text
    pub content: String,
}

impl Generation {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// The core text generation trait.
///
/// Every model backend (OpenAI-compatible endpoints, mocks) implements this.
/// Callers hold `Arc<dyn TextGenerator>` and never know which backend is
/// answering — pure polymorphism.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// A human-readable name for this generator (e.g., "openai", "mock").
    fn name(&self) -> &str;

    /// Send a prompt and get the complete response.
    async fn generate(&self, prompt: &str) -> std::result::Result<Generation, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedGenerator;

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _prompt: &str) -> Result<Generation, ProviderError> {
            Ok(Generation::new("yes"))
        }
    }

    #[tokio::test]
    async fn trait_objects_are_callable() {
        let generator: std::sync::Arc<dyn TextGenerator> = std::sync::Arc::new(CannedGenerator);
        let output = generator.generate("Is water wet?").await.unwrap();
        assert_eq!(output.content, "yes");
        assert_eq!(generator.name(), "canned");
    }

    #[test]
    fn generation_serializes_content() {
        let json = serde_json::to_string(&Generation::new("hello")).unwrap();
        assert!(json.contains("hello"));
    }
}
