//! Context persistence backends.
//!
//! Three implementations of `ContextStore`:
//! - [`SqliteStore`] — one row per thread in a `conversations` table
//!   (feature `sqlite`, default on);
//! - [`InMemoryStore`] — a map behind an `RwLock`, for tests and ephemeral
//!   sessions;
//! - [`NoopStore`] — remembers nothing, for stateless runs.
//!
//! Loads run stored JSON through the lenient context validation, so corrupt
//! rows degrade to a fresh context rather than failing the thread.

pub mod in_memory;
pub mod noop;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use noop::NoopStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use std::sync::Arc;

use biotutor_config::StoreConfig;
use biotutor_core::{ContextStore, StoreError};
use tracing::info;

/// Build the configured store backend.
///
/// An unknown backend name falls back to in-memory with a log line rather
/// than failing the startup.
pub async fn build_from_config(config: &StoreConfig) -> Result<Arc<dyn ContextStore>, StoreError> {
    match config.backend.as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = config.sqlite_file();
            let store = SqliteStore::new(&path.to_string_lossy()).await?;
            Ok(Arc::new(store))
        }
        "none" => Ok(Arc::new(NoopStore)),
        other => {
            if other != "memory" {
                info!(backend = other, "unknown store backend, using in-memory");
            }
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}
