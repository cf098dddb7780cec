//! Text generator backends for biotutor.
//!
//! One production implementation speaks the OpenAI-compatible
//! `/chat/completions` protocol; the [`testing`] module carries scripted
//! generators for tests in other crates.

pub mod openai_compat;
pub mod testing;

pub use openai_compat::OpenAiCompatGenerator;

use std::sync::Arc;

use biotutor_config::AppConfig;
use biotutor_core::{ProviderError, TextGenerator};

/// Build the configured production generator.
///
/// Fails when no API key is configured; everything else about the endpoint
/// has a default.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn TextGenerator>, ProviderError> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            ProviderError::NotConfigured("no API key set (api_key or BIOTUTOR_API_KEY)".into())
        })?;

    Ok(Arc::new(OpenAiCompatGenerator::new(
        &config.base_url,
        api_key,
        &config.model,
        config.temperature,
    )))
}
