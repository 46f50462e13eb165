//! SQLite record store.
//!
//! A single `transformations` table. `seq` is the insertion sequence used to
//! break ties between records created in the same instant. Timestamps are
//! stored as fixed-width RFC 3339 UTC text, so text order is time order.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use stylecraft_core::{
    HistoryEntry, RecordId, RecordStore, StorageError, Style, TransformationResult,
};
use tracing::{debug, info};

use crate::sql_error::{read_error, write_error};

const SELECT_COLUMNS: &str = "seq, id, original_query, style, response_text, created_at";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and run migrations.
    ///
    /// `sqlite::memory:` gives an ephemeral database, useful for tests.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StorageError::Unavailable(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // An in-memory database lives only as long as its connection, so
        // keep exactly one and never recycle it.
        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Unavailable(format!("Failed to open SQLite: {e}")))?;

        let store = Self::from_pool(pool).await?;
        info!("SQLite record store initialized at {url}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transformations (
                seq             INTEGER PRIMARY KEY AUTOINCREMENT,
                id              TEXT UNIQUE NOT NULL,
                original_query  TEXT NOT NULL,
                style           TEXT NOT NULL CHECK (style IN ('casual', 'formal')),
                response_text   TEXT NOT NULL CHECK (length(response_text) > 0),
                created_at      TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::MigrationFailed(format!("transformations table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_transformations_recency \
             ON transformations(created_at DESC, seq DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::MigrationFailed(format!("recency index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<HistoryEntry, StorageError> {
        let style: String = row.try_get("style").map_err(read_error)?;
        let style = Style::from_str(&style).map_err(|e| StorageError::Read(e.to_string()))?;

        let created_at: String = row.try_get("created_at").map_err(read_error)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StorageError::Read(format!("created_at column: {e}")))?;

        Ok(HistoryEntry {
            id: RecordId(row.try_get("id").map_err(read_error)?),
            sequence: row.try_get("seq").map_err(read_error)?,
            original_query: row.try_get("original_query").map_err(read_error)?,
            style,
            response_text: row.try_get("response_text").map_err(read_error)?,
            created_at,
        })
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn save(&self, result: TransformationResult) -> Result<RecordId, StorageError> {
        let id = RecordId::new();

        sqlx::query(
            "INSERT INTO transformations (id, original_query, style, response_text, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.as_str())
        .bind(&result.original_query)
        .bind(result.style.as_str())
        .bind(&result.response_text)
        .bind(timestamp(&result.created_at))
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        debug!(id = %id, "Saved transformation");
        Ok(id)
    }

    async fn list_history(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<HistoryEntry>, StorageError> {
        let Some((limit, offset)) = crate::sql_page(limit, offset) else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM transformations \
             ORDER BY created_at DESC, seq DESC LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn get(&self, id: &RecordId) -> Result<Option<HistoryEntry>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM transformations WHERE id = ?"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?;

        row.as_ref().map(Self::row_to_entry).transpose()
    }

    async fn count(&self) -> Result<usize, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM transformations")
            .fetch_one(&self.pool)
            .await
            .map_err(read_error)?;

        let count: i64 = row.try_get("cnt").map_err(read_error)?;
        Ok(count as usize)
    }
}
