//! sp-db - Sandbox layer for SchemaProbe
//!
//! This crate owns the ephemeral in-memory SQLite instance a verification
//! run executes against: DDL bootstrap with skip-on-error semantics,
//! statement execution with string-captured engine errors, and the
//! savepoint primitives used for per-test isolation.

pub mod error;
pub mod sandbox;

pub use error::{DbError, DbResult};
pub use sandbox::{QueryOutput, Sandbox};
