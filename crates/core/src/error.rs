//! Error types for the StyleCraft domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`TransformError`] is the
//! single type that crosses the orchestrator boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::TransformationResult;

/// Every failure a caller can observe, named the way it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    ModelUnreachable,
    ModelTimeout,
    ModelMalformedResponse,
    EmptyResponse,
    StorageUnavailable,
    StorageWrite,
    PersistenceFailedAfterSuccess,
    Configuration,
    NotFound,
}

impl ErrorKind {
    /// The snake_case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::ModelUnreachable => "model_unreachable",
            ErrorKind::ModelTimeout => "model_timeout",
            ErrorKind::ModelMalformedResponse => "model_malformed_response",
            ErrorKind::EmptyResponse => "empty_response",
            ErrorKind::StorageUnavailable => "storage_unavailable",
            ErrorKind::StorageWrite => "storage_write",
            ErrorKind::PersistenceFailedAfterSuccess => "persistence_failed_after_success",
            ErrorKind::Configuration => "configuration",
            ErrorKind::NotFound => "not_found",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Bounded context errors ---

/// Failures of a single completion call against the model backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Model backend unreachable: {0}")]
    Unreachable(String),

    #[error("Model backend did not respond within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Model backend returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl ModelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::Unreachable(_) => ErrorKind::ModelUnreachable,
            ModelError::Timeout { .. } => ErrorKind::ModelTimeout,
            ModelError::MalformedResponse(_) => ErrorKind::ModelMalformedResponse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("Model returned an empty completion")]
    EmptyResponse,
}

/// Failures of the durable record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write failed: {0}")]
    Write(String),

    #[error("Stored record could not be decoded: {0}")]
    Read(String),

    #[error("Storage migration failed: {0}")]
    MigrationFailed(String),
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::Write(_) => ErrorKind::StorageWrite,
            StorageError::Unavailable(_)
            | StorageError::Read(_)
            | StorageError::MigrationFailed(_) => ErrorKind::StorageUnavailable,
        }
    }
}

/// The structured failure of one transformation request.
///
/// Every per-request failure is converted into this type at the
/// orchestrator boundary.
#[derive(Debug, Clone, Error)]
pub enum TransformError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// A storage failure outside the transform path (history reads).
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The model produced a usable response but it could not be saved.
    /// The generated result is carried so the caller can still show it.
    #[error("Response generated but could not be saved: {source}")]
    PersistenceFailedAfterSuccess {
        result: TransformationResult,
        source: StorageError,
    },
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::InvalidInput(_) => ErrorKind::InvalidInput,
            TransformError::Model(e) => e.kind(),
            TransformError::Normalization(NormalizationError::EmptyResponse) => {
                ErrorKind::EmptyResponse
            }
            TransformError::Storage(e) => e.kind(),
            TransformError::PersistenceFailedAfterSuccess { .. } => {
                ErrorKind::PersistenceFailedAfterSuccess
            }
        }
    }

    /// "Could not generate a response": upstream model failures, including
    /// empty completions.
    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            TransformError::Model(_) | TransformError::Normalization(_)
        )
    }

    /// The generated result, if the transformation itself succeeded.
    pub fn generated(&self) -> Option<&TransformationResult> {
        match self {
            TransformError::PersistenceFailedAfterSuccess { result, .. } => Some(result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;
    use chrono::Utc;

    #[test]
    fn model_error_displays_timeout() {
        let err = ModelError::Timeout { timeout_ms: 30_000 };
        assert!(err.to_string().contains("30000ms"));
        assert_eq!(err.kind(), ErrorKind::ModelTimeout);
    }

    #[test]
    fn empty_response_counts_as_model_failure() {
        let err = TransformError::from(NormalizationError::EmptyResponse);
        assert!(err.is_model_failure());
        assert_eq!(err.kind(), ErrorKind::EmptyResponse);
    }

    #[test]
    fn persistence_failure_keeps_generated_text() {
        let err = TransformError::PersistenceFailedAfterSuccess {
            result: TransformationResult {
                original_query: "hi".into(),
                style: Style::Casual,
                response_text: "Hey there!".into(),
                created_at: Utc::now(),
            },
            source: StorageError::Unavailable("connection refused".into()),
        };
        assert!(!err.is_model_failure());
        assert_eq!(err.kind(), ErrorKind::PersistenceFailedAfterSuccess);
        assert_eq!(err.generated().map(|r| r.response_text.as_str()), Some("Hey there!"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn error_kind_wire_names() {
        let json = serde_json::to_string(&ErrorKind::ModelMalformedResponse).unwrap();
        assert_eq!(json, "\"model_malformed_response\"");
        assert_eq!(
            ErrorKind::PersistenceFailedAfterSuccess.to_string(),
            "persistence_failed_after_success"
        );
    }

    #[test]
    fn storage_error_kinds() {
        assert_eq!(StorageError::Write("x".into()).kind(), ErrorKind::StorageWrite);
        assert_eq!(
            StorageError::Unavailable("x".into()).kind(),
            ErrorKind::StorageUnavailable
        );
    }
}
