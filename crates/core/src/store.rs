//! Record store trait: durable persistence of transformation results.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::{HistoryEntry, RecordId, TransformationResult};

/// The core RecordStore trait.
///
/// Implementations: SQLite, PostgreSQL, in-memory (for testing).
///
/// `save` is atomic: a record is either fully visible to later reads or not
/// visible at all.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The backend name (e.g. "sqlite", "postgres", "in_memory").
    fn name(&self) -> &str;

    /// Durably persist a result and return its new id.
    async fn save(&self, result: TransformationResult) -> Result<RecordId, StorageError>;

    /// Newest first (`created_at` desc, then insertion sequence desc).
    /// An empty store yields an empty vector, never an error.
    async fn list_history(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<HistoryEntry>, StorageError>;

    /// Fetch one record by id.
    async fn get(&self, id: &RecordId) -> Result<Option<HistoryEntry>, StorageError>;

    /// Total number of stored records.
    async fn count(&self) -> Result<usize, StorageError>;
}
