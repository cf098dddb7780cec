//! Configuration loading, validation, and management for biotutor.
//!
//! Loads configuration from `~/.biotutor/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.biotutor/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model provider base URL (OpenAI-compatible)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature; kept low so routing and extraction stay
    /// deterministic
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Intent router configuration
    #[serde(default)]
    pub router: RouterConfig,

    /// Domain classifier configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Context store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// History filtering caps
    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_temperature() -> f32 {
    0.0
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("router", &self.router)
            .field("classifier", &self.classifier)
            .field("store", &self.store)
            .field("history", &self.history)
            .finish()
    }
}

/// Which intent router runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// "lexical" (pattern scoring, no model call) or "model"
    #[serde(default = "default_router_strategy")]
    pub strategy: String,
}

fn default_router_strategy() -> String {
    "lexical".into()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            strategy: default_router_strategy(),
        }
    }
}

/// Domain classifier behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// When the model call that would decide fails: admit the query (true)
    /// or refuse it (false). Defaults closed.
    #[serde(default)]
    pub fail_open: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { fail_open: false }
    }
}

/// Context persistence backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "sqlite", "memory", or "none"
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// SQLite database file; defaults to `~/.biotutor/memory.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlite_path: Option<String>,
}

fn default_store_backend() -> String {
    "sqlite".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            sqlite_path: None,
        }
    }
}

impl StoreConfig {
    /// The sqlite file to open, explicit or default.
    pub fn sqlite_file(&self) -> PathBuf {
        match &self.sqlite_path {
            Some(path) => PathBuf::from(path),
            None => AppConfig::config_dir().join("memory.db"),
        }
    }
}

/// Caps applied when trimming history into a prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Most messages kept after role filtering
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Estimated-token budget for the kept messages
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Most recent student messages kept
    #[serde(default = "default_user_messages")]
    pub user_messages: usize,

    /// Most recent tutor messages kept
    #[serde(default = "default_ai_messages")]
    pub ai_messages: usize,
}

fn default_max_messages() -> usize {
    15
}
fn default_max_tokens() -> usize {
    6000
}
fn default_user_messages() -> usize {
    7
}
fn default_ai_messages() -> usize {
    7
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            max_tokens: default_max_tokens(),
            user_messages: default_user_messages(),
            ai_messages: default_ai_messages(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.biotutor/config.toml).
    ///
    /// Also checks environment variables:
    /// - `BIOTUTOR_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `BIOTUTOR_MODEL` overrides the model
    /// - `BIOTUTOR_STORE` overrides the store backend
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("BIOTUTOR_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("BIOTUTOR_MODEL") {
            config.model = model;
        }

        if let Ok(backend) = std::env::var("BIOTUTOR_STORE") {
            config.store.backend = backend;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".biotutor")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        match self.router.strategy.as_str() {
            "lexical" | "model" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "router.strategy must be \"lexical\" or \"model\", got \"{other}\""
                )));
            }
        }

        match self.store.backend.as_str() {
            "sqlite" | "memory" | "none" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "store.backend must be \"sqlite\", \"memory\", or \"none\", got \"{other}\""
                )));
            }
        }

        if self.history.max_messages == 0 {
            return Err(ConfigError::ValidationError(
                "history.max_messages must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            router: RouterConfig::default(),
            classifier: ClassifierConfig::default(),
            store: StoreConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
