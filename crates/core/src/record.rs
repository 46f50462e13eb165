//! Request and record value objects.
//!
//! These flow through the whole pipeline:
//! caller builds a [`TransformationRequest`] → orchestrator produces a
//! [`TransformationResult`] → store persists it and lists [`HistoryEntry`]s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TransformError;
use crate::style::Style;

/// Store-assigned identifier for a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A validated incoming transformation call. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationRequest {
    query: String,
    style: Style,
}

impl TransformationRequest {
    /// Validate raw caller input.
    ///
    /// Fails with [`TransformError::InvalidInput`] when the style is not one
    /// of `casual`/`formal` or the query is empty after trimming.
    pub fn parse(query: &str, style: &str) -> Result<Self, TransformError> {
        let style: Style = style
            .parse()
            .map_err(|e: crate::style::ParseStyleError| TransformError::InvalidInput(e.to_string()))?;
        Self::new(query, style)
    }

    pub fn new(query: impl Into<String>, style: Style) -> Result<Self, TransformError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(TransformError::InvalidInput(
                "query must not be empty".into(),
            ));
        }
        Ok(Self { query, style })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn style(&self) -> Style {
        self.style
    }
}

/// The outcome of a successful model call. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationResult {
    pub original_query: String,
    pub style: Style,
    pub response_text: String,
    pub created_at: DateTime<Utc>,
}

/// Read-only projection of a stored [`TransformationResult`].
///
/// Listings are ordered by `created_at` descending, ties broken by
/// `sequence` descending (later insert first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: RecordId,
    /// Store-assigned insertion sequence.
    pub sequence: i64,
    pub original_query: String,
    pub style: Style,
    pub response_text: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Ordering key: newest first, then latest insert first.
    pub fn recency_cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .created_at
            .cmp(&self.created_at)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// One page of history plus the total record count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}
