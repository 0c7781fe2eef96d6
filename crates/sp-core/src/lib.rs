//! sp-core - Core library for SchemaProbe
//!
//! This crate provides the shared data model (ERD schema, test cases,
//! incidents, patches), the foreign-key dependency graph used for seed
//! ordering, and SQL construction utilities used across all SchemaProbe
//! components.

pub mod dag;
pub mod error;
pub mod incident;
pub mod schema;
pub mod sql_utils;
pub mod testing;

pub use dag::TableDag;
pub use error::{CoreError, CoreResult};
pub use incident::{Incident, IncidentStatus, Patch};
pub use schema::{
    Cardinality, Column, ConstraintType, OnDeleteAction, Relationship, Schema, Table,
    TableConstraint, TableIndex,
};
pub use sql_utils::{escape_sql_string, quote_ident, sql_string_literal, InsertBuilder};
pub use testing::{ExpectedResult, TestCase, TestCategory, TestResult};
