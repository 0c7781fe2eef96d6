//! Error types for sp-db

use thiserror::Error;

/// Sandbox operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Engine instance could not be created (D001)
    #[error("[D001] Sandbox connection failed: {0}")]
    ConnectionError(String),

    /// Statement rejected by the engine (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Query produced no readable result (D003)
    #[error("[D003] Query returned no result: {0}")]
    EmptyResult(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
