//! SQLite backend.
//!
//! One row per thread in a `conversations` table; the context travels as a
//! JSON payload. Saves upsert on the thread id. A row whose payload no
//! longer parses is treated as absent so the thread restarts with an empty
//! context instead of erroring forever.

use async_trait::async_trait;
use biotutor_core::{ContextStore, ConversationContext, StoreError, ThreadId};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info, warn};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// Pass `"sqlite::memory:"` for an in-process ephemeral database
    /// (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite context store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                thread_id    TEXT PRIMARY KEY,
                context_json TEXT NOT NULL,
                created_at   TEXT NOT NULL,
                updated_at   TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::NotInitialized(format!("conversations table: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }
}

#[async_trait]
impl ContextStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(
        &self,
        thread_id: &ThreadId,
    ) -> Result<Option<ConversationContext>, StoreError> {
        let row = sqlx::query("SELECT context_json FROM conversations WHERE thread_id = ?1")
            .bind(thread_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("SELECT failed: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: String = row
            .try_get("context_json")
            .map_err(|e| StoreError::Storage(format!("context_json column: {e}")))?;

        match serde_json::from_str::<serde_json::Value>(&payload) {
            Ok(value) => Ok(Some(ConversationContext::from_value(&value))),
            Err(err) => {
                // Unrecoverable row; let the thread start over.
                warn!(thread = %thread_id, error = %err, "corrupt context row, treating as absent");
                Ok(None)
            }
        }
    }

    async fn save(
        &self,
        thread_id: &ThreadId,
        context: &ConversationContext,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_string(context)
            .map_err(|e| StoreError::Corrupt(format!("context serialization: {e}")))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO conversations (thread_id, context_json, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ON CONFLICT(thread_id) DO UPDATE SET
                context_json = excluded.context_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(thread_id.as_str())
        .bind(&payload)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("UPSERT failed: {e}")))?;

        debug!(thread = %thread_id, "saved context");
        Ok(())
    }
}
