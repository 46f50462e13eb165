//! Mapping of `sqlx` failures onto [`StorageError`].

use stylecraft_core::StorageError;

/// Classify a failed write. Rejections by the database itself (constraint
/// violations, bad values) are write errors; anything that prevented the
/// statement from reaching the database is an availability problem.
pub(crate) fn write_error(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::Database(db) => StorageError::Write(db.to_string()),
        sqlx::Error::Encode(err) => StorageError::Write(err.to_string()),
        other => StorageError::Unavailable(other.to_string()),
    }
}

/// Classify a failed read.
pub(crate) fn read_error(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => StorageError::Read(e.to_string()),
        other => StorageError::Unavailable(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_unavailable() {
        assert!(matches!(
            write_error(sqlx::Error::PoolTimedOut),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            read_error(sqlx::Error::PoolClosed),
            StorageError::Unavailable(_)
        ));
    }

    #[test]
    fn missing_column_is_a_read_error() {
        assert!(matches!(
            read_error(sqlx::Error::ColumnNotFound("style".into())),
            StorageError::Read(_)
        ));
    }
}
