//! In-memory store, useful for testing and throwaway sessions.

use async_trait::async_trait;
use std::sync::Arc;
use stylecraft_core::{HistoryEntry, RecordId, RecordStore, StorageError, TransformationResult};
use tokio::sync::RwLock;

/// Stores records in a Vec. Nothing survives the process.
pub struct InMemoryStore {
    entries: Arc<RwLock<Vec<HistoryEntry>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn save(&self, result: TransformationResult) -> Result<RecordId, StorageError> {
        // Same constraint the SQL schemas enforce
        if result.response_text.is_empty() {
            return Err(StorageError::Write("response_text must not be empty".into()));
        }

        let id = RecordId::new();
        let mut entries = self.entries.write().await;
        let sequence = entries.len() as i64 + 1;
        entries.push(HistoryEntry {
            id: id.clone(),
            sequence,
            original_query: result.original_query,
            style: result.style,
            response_text: result.response_text,
            created_at: result.created_at,
        });
        Ok(id)
    }

    async fn list_history(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<HistoryEntry>, StorageError> {
        let entries = self.entries.read().await;
        let mut sorted: Vec<HistoryEntry> = entries.clone();
        sorted.sort_by(HistoryEntry::recency_cmp);
        Ok(sorted.into_iter().skip(offset).take(limit).collect())
    }

    async fn get(&self, id: &RecordId) -> Result<Option<HistoryEntry>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| &e.id == id).cloned())
    }

    async fn count(&self) -> Result<usize, StorageError> {
        Ok(self.entries.read().await.len())
    }
}
