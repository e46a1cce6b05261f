//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError`
//! from `peoples_core::storage`.

use peoples_core::storage::RepositoryError;
use thiserror::Error;

/// A write failed and the transaction could not be rolled back either.
///
/// Carried through `tokio_rusqlite::Error::Other` out of the connection
/// thread and turned into `RepositoryError::RollbackFailed`.
#[derive(Debug, Error)]
#[error("rollback failed after `{cause}`: {reason}")]
pub struct RollbackFailure {
    pub cause: rusqlite::Error,
    pub reason: rusqlite::Error,
}

/// Maps a rusqlite error with a known ID to a RepositoryError.
///
/// - `QueryReturnedNoRows` -> `NotFound`
/// - CHECK / NOT NULL constraint violations -> `InvalidData`
/// - `CannotOpen` -> `ConnectionFailed`
/// - conversion failures -> `Serialization`
/// - everything else -> `QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str, id: &str) -> RepositoryError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
            entity_type,
            id: id.to_string(),
        },

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_CHECK
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL =>
        {
            RepositoryError::InvalidData(err.to_string())
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::FromSqlConversionFailure(..) | rusqlite::Error::InvalidColumnType(..) => {
            RepositoryError::Serialization(err.to_string())
        }

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error with a known ID to a RepositoryError.
///
/// Use `"unknown"` as the id when the call site has none.
pub fn map_tokio_rusqlite_error_with_id(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let id_str = id.into();
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, &id_str)
        }
        tokio_rusqlite::Error::Close(_) | tokio_rusqlite::Error::ConnectionClosed => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        tokio_rusqlite::Error::Other(inner) => match inner.downcast_ref::<RollbackFailure>() {
            Some(failure) => RepositoryError::RollbackFailed {
                cause: failure.cause.to_string(),
                reason: failure.reason.to_string(),
            },
            None => RepositoryError::QueryFailed(err.to_string()),
        },
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}
