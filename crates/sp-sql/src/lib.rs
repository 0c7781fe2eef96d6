//! sp-sql - Dialect compiler for SchemaProbe
//!
//! Translates the abstract relational schema into a SQLite DDL script:
//! type mapping, default-value and CHECK-expression normalization, inline
//! auto-increment primary keys, and idempotent index creation. Pure text
//! transformation, no I/O.

pub mod compiler;
pub mod dialect;

pub use compiler::compile_schema;
pub use dialect::{map_data_type, normalize_default_value, normalize_expression};
