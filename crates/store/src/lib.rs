//! Record store implementations for StyleCraft.
//!
//! All backends implement `stylecraft_core::RecordStore`. [`open`] picks one
//! from the configured storage URL:
//!
//! | URL | Backend |
//! |---|---|
//! | `sqlite:<path>` / `sqlite::memory:` | [`SqliteStore`] (feature `sqlite`, default) |
//! | `postgres://...` / `postgresql://...` | `PostgresStore` (feature `postgres`) |
//! | `memory` | [`InMemoryStore`] |

use std::sync::Arc;

use stylecraft_config::StorageConfig;
use stylecraft_core::{RecordStore, StorageError};

pub mod in_memory;

#[cfg(any(feature = "sqlite", feature = "postgres"))]
mod sql_error;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

/// Open the configured store, creating its schema if needed.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn RecordStore>, StorageError> {
    let url = config
        .url
        .as_deref()
        .map(str::trim)
        .ok_or_else(|| StorageError::Unavailable("no storage URL configured".into()))?;

    if url == "memory" {
        return Ok(Arc::new(InMemoryStore::new()));
    }

    if url.starts_with("sqlite:") {
        #[cfg(feature = "sqlite")]
        {
            let store = SqliteStore::connect(url, config.max_connections).await?;
            return Ok(Arc::new(store));
        }
        #[cfg(not(feature = "sqlite"))]
        return Err(StorageError::Unavailable(
            "SQLite support not compiled in (enable the `sqlite` feature)".into(),
        ));
    }

    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        #[cfg(feature = "postgres")]
        {
            let store = PostgresStore::connect(url, config.max_connections).await?;
            store.migrate().await?;
            return Ok(Arc::new(store));
        }
        #[cfg(not(feature = "postgres"))]
        return Err(StorageError::Unavailable(
            "PostgreSQL support not compiled in (enable the `postgres` feature)".into(),
        ));
    }

    Err(StorageError::Unavailable(format!(
        "unsupported storage URL scheme in '{}'",
        config.redacted_url()
    )))
}

/// `LIMIT`/`OFFSET` bind values, or `None` when the offset is past any
/// row a SQL store can hold.
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub(crate) fn sql_page(limit: usize, offset: usize) -> Option<(i64, i64)> {
    let offset = i64::try_from(offset).ok()?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    Some((limit, offset))
}
