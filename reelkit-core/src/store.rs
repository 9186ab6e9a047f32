//! Durable registry of library roots and their capability tokens.
//!
//! Pure persistence: the store never touches the directories it records.
//! One SQLite file under the per-application support directory, schema
//! created idempotently at open.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, info};

use reelkit_model::{LibraryEntry, LibraryEntryId};

use crate::error::{CoreError, Result};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS directories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    path TEXT NOT NULL UNIQUE,
    capability_token BLOB NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Persistence port for the library registry.
///
/// The concrete store is [`LibraryStore`]; the trait exists so the façade
/// and tests can swap in doubles.
#[async_trait]
pub trait LibraryRegistry: Send + Sync + std::fmt::Debug {
    /// Record a library root. Idempotent: inserting an already-registered
    /// path returns the existing entry unchanged, token included.
    async fn insert(&self, path: &str, token: &[u8]) -> Result<LibraryEntry>;

    /// Delete a library root. Returns whether a row was actually removed;
    /// a missing path is not an error.
    async fn remove(&self, path: &str) -> Result<bool>;

    /// All entries, oldest first.
    async fn list_all(&self) -> Result<Vec<LibraryEntry>>;

    /// Fast existence check for first-run UI, without materializing rows.
    async fn is_empty(&self) -> Result<bool>;
}

/// SQLite-backed [`LibraryRegistry`].
///
/// Opened once at process start and injected into whatever needs it;
/// writes are committed before the call returns.
#[derive(Debug, Clone)]
pub struct LibraryStore {
    pool: SqlitePool,
}

impl LibraryStore {
    /// Open (creating if missing) the registry at `path` and ensure the
    /// schema exists. Any failure here is fatal for the caller: without a
    /// working registry there is no degraded mode.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CoreError::StoreUnavailable(format!(
                    "cannot create support directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = Self::connect(options).await?;

        info!(path = %path.display(), "library registry opened");
        Ok(Self { pool })
    }

    /// In-memory registry, for tests.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = Self::connect(options).await?;
        Ok(Self { pool })
    }

    async fn connect(options: SqliteConnectOptions) -> Result<SqlitePool> {
        // A single connection keeps registry writes serialized; cardinality
        // is tiny so readers never queue for long. The connection must not
        // be recycled: an in-memory registry lives and dies with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| CoreError::StoreUnavailable(format!("cannot open registry: {e}")))?;

        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| CoreError::StoreUnavailable(format!("cannot create schema: {e}")))?;

        Ok(pool)
    }

    /// Close the pool. Called at shutdown; pending writes are already
    /// durable by then.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn get(&self, path: &str) -> Result<Option<LibraryEntry>> {
        let row = sqlx::query(
            "SELECT id, path, capability_token, created_at FROM directories WHERE path = ?1",
        )
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::entry_from_row).transpose()
    }

    fn entry_from_row(row: sqlx::sqlite::SqliteRow) -> Result<LibraryEntry> {
        Ok(LibraryEntry {
            id: LibraryEntryId(row.try_get("id")?),
            path: row.try_get("path")?,
            capability_token: row.try_get("capability_token")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }
}

#[async_trait]
impl LibraryRegistry for LibraryStore {
    async fn insert(&self, path: &str, token: &[u8]) -> Result<LibraryEntry> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO directories (path, capability_token, created_at) \
             VALUES (?1, ?2, ?3)",
        )
        .bind(path)
        .bind(token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            debug!(path, "library entry recorded");
        } else {
            debug!(path, "library entry already present; kept unchanged");
        }

        self.get(path).await?.ok_or_else(|| {
            CoreError::StoreUnavailable(format!("row for {path} vanished after insert"))
        })
    }

    async fn remove(&self, path: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM directories WHERE path = ?1")
            .bind(path)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<LibraryEntry>> {
        let rows = sqlx::query(
            "SELECT id, path, capability_token, created_at FROM directories \
             ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::entry_from_row).collect()
    }

    async fn is_empty(&self) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM directories) AS present")
            .fetch_one(&self.pool)
            .await?;

        let present: i64 = row.try_get("present")?;
        Ok(present == 0)
    }
}

/// Default registry location under the per-user data directory, e.g.
/// `~/Library/Application Support/reelkit/reelkit.sqlite` on macOS.
pub fn default_database_path() -> Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| {
        CoreError::StoreUnavailable("no per-user data directory available".to_string())
    })?;

    Ok(base.join("reelkit").join("reelkit.sqlite"))
}
