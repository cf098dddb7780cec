//! Scripted generators for tests.
//!
//! These live in the library (not behind `cfg(test)`) so downstream crates
//! can drive their own tests with them.

use async_trait::async_trait;
use biotutor_core::{Generation, ProviderError, TextGenerator};
use std::sync::Mutex;

/// Returns scripted responses in order, one per `generate` call.
///
/// Panics when the script runs out — a test that calls the model more times
/// than it scripted is a broken test.
pub struct SequentialGenerator {
    responses: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl SequentialGenerator {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// The prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// How many scripted responses remain unconsumed.
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for SequentialGenerator {
    fn name(&self) -> &str {
        "sequential-mock"
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            panic!("SequentialGenerator exhausted: unexpected extra generate call");
        }
        Ok(Generation::new(responses.remove(0)))
    }
}

/// Always fails with the given error.
pub struct FailingGenerator(pub ProviderError);

impl FailingGenerator {
    pub fn timeout() -> Self {
        Self(ProviderError::Timeout("scripted timeout".into()))
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing-mock"
    }

    async fn generate(&self, _prompt: &str) -> Result<Generation, ProviderError> {
        Err(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responses_come_back_in_order() {
        let generator = SequentialGenerator::new(vec!["first", "second"]);
        assert_eq!(generator.generate("a").await.unwrap().content, "first");
        assert_eq!(generator.generate("b").await.unwrap().content, "second");
        assert_eq!(generator.prompts(), vec!["a", "b"]);
        assert_eq!(generator.remaining(), 0);
    }

    #[tokio::test]
    #[should_panic(expected = "exhausted")]
    async fn exhausted_script_panics() {
        let generator = SequentialGenerator::new(vec![]);
        let _ = generator.generate("a").await;
    }

    #[tokio::test]
    async fn failing_generator_fails() {
        let generator = FailingGenerator::timeout();
        assert!(generator.generate("a").await.is_err());
    }
}
