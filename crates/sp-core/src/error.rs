//! Error types for sp-core

use thiserror::Error;

/// Core error type for SchemaProbe
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: A referenced table does not exist in the schema
    #[error("[E001] Unknown table: {name}")]
    UnknownTable { name: String },

    /// E002: A referenced column does not exist on the table
    #[error("[E002] Unknown column {column} on table {table}")]
    UnknownColumn { table: String, column: String },

    /// E003: Empty identifier where a name was required
    #[error("[E003] Empty name: {context}")]
    EmptyName { context: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
