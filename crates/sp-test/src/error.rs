//! Error types for sp-test

use sp_db::DbError;
use thiserror::Error;

/// Errors that escape a verification run.
///
/// Everything below the runner/verifier boundary is recovered into
/// structured results; what remains are host-level failures (sandbox
/// creation, seeding into a schema the caller failed to validate).
#[derive(Error, Debug)]
pub enum TestError {
    /// T001: Sandbox or seeding failure
    #[error("[T001] {0}")]
    Db(#[from] DbError),
}

/// Result type alias for TestError
pub type RunResult<T> = Result<T, TestError>;
