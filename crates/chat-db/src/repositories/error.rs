//! Error handling utilities for repositories

use chat_core::{DomainError, RowId};
use sqlx::Error as SqlxError;

/// Postgres SQLSTATE for `duplicate_column`
const DUPLICATE_COLUMN: &str = "42701";

/// Convert SQLx error to DomainError
///
/// Transport-level failures become `ConnectionUnavailable`, everything else
/// the store reports becomes `DatabaseError`.
pub fn map_db_error(e: SqlxError) -> DomainError {
    match e {
        SqlxError::Io(_)
        | SqlxError::Tls(_)
        | SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::WorkerCrashed => DomainError::ConnectionUnavailable(e.to_string()),
        _ => DomainError::DatabaseError(e.to_string()),
    }
}

/// Check for a foreign key violation and return the appropriate error or fallback
pub fn map_foreign_key_violation<F>(e: SqlxError, on_violation: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return on_violation();
        }
    }
    map_db_error(e)
}

/// Whether the error is "column already exists"
pub fn is_duplicate_column(e: &SqlxError) -> bool {
    e.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == DUPLICATE_COLUMN)
}

/// Create a "conversation not found" error
pub fn conversation_not_found(id: RowId) -> DomainError {
    DomainError::ConversationNotFound(id)
}
