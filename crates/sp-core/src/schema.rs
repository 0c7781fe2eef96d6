//! ERD schema representation
//!
//! The schema is supplied by the caller (typically deserialized from the
//! designer's JSON payload) and treated as read-only for the duration of a
//! verification run. The engine assumes schema/relationship cross-references
//! were checked upstream; [`Schema::validate`] is the check ingestion
//! boundaries are expected to run.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Constraint kinds a table can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintType {
    PrimaryKey,
    ForeignKey,
    Unique,
    Check,
    NotNull,
}

/// Referential action for ON DELETE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnDeleteAction {
    Cascade,
    SetNull,
    Restrict,
    NoAction,
}

impl OnDeleteAction {
    /// Render as the SQL clause body (`SET_NULL` -> `SET NULL`)
    pub fn as_sql(self) -> &'static str {
        match self {
            OnDeleteAction::Cascade => "CASCADE",
            OnDeleteAction::SetNull => "SET NULL",
            OnDeleteAction::Restrict => "RESTRICT",
            OnDeleteAction::NoAction => "NO ACTION",
        }
    }
}

/// Relationship cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "1:1")]
    OneToOne,
    #[serde(rename = "1:N")]
    OneToMany,
    #[serde(rename = "M:N")]
    ManyToMany,
}

/// A single column of a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Abstract data type as authored (e.g. `SERIAL`, `VARCHAR(255)`, `TIMESTAMP`)
    pub data_type: String,

    /// Whether NULL is allowed
    pub nullable: bool,

    /// Default expression, if any
    #[serde(default)]
    pub default_value: Option<String>,

    /// Whether the column participates in the primary key
    pub is_primary_key: bool,

    /// Whether the column references another table
    #[serde(default)]
    pub is_foreign_key: bool,

    /// Referenced table name for FK columns
    #[serde(default)]
    pub references_table: Option<String>,

    /// Referenced column name for FK columns
    #[serde(default)]
    pub references_column: Option<String>,
}

impl Column {
    /// Whether the abstract type is a serial (auto-increment) type
    pub fn has_serial_type(&self) -> bool {
        self.data_type.to_uppercase().contains("SERIAL")
    }

    /// Whether the abstract type is integer-like (includes serial types)
    pub fn has_integer_type(&self) -> bool {
        let upper = self.data_type.to_uppercase();
        upper.contains("INT") || upper.contains("SERIAL")
    }

    /// The (table, column) pair this column references, when fully specified
    pub fn foreign_key_target(&self) -> Option<(&str, &str)> {
        if !self.is_foreign_key {
            return None;
        }
        match (&self.references_table, &self.references_column) {
            (Some(table), Some(column)) => Some((table.as_str(), column.as_str())),
            _ => None,
        }
    }
}

/// A table-level constraint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConstraint {
    /// Constraint kind
    #[serde(rename = "type")]
    pub kind: ConstraintType,

    /// Participating column names
    pub columns: Vec<String>,

    /// Boolean expression for CHECK constraints
    #[serde(default)]
    pub expression: Option<String>,

    /// ON DELETE action for FOREIGN KEY constraints
    #[serde(default)]
    pub on_delete: Option<OnDeleteAction>,
}

/// A secondary index on a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableIndex {
    /// Index name
    pub name: String,

    /// Indexed column names
    pub columns: Vec<String>,

    /// Whether the index enforces uniqueness
    pub unique: bool,
}

/// A table in the schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Stable identifier
    pub id: String,

    /// Table name
    pub name: String,

    /// Ordered column list
    pub columns: Vec<Column>,

    /// Declared constraints
    #[serde(default)]
    pub constraints: Vec<TableConstraint>,

    /// Declared indexes
    #[serde(default)]
    pub indexes: Vec<TableIndex>,
}

impl Table {
    /// Whether `column` is the table's sole, integer, auto-incrementing
    /// primary key. Such a column is never inserted explicitly; the engine
    /// assigns its value.
    pub fn is_auto_primary_key(&self, column: &Column) -> bool {
        let pk_columns: Vec<&Column> = self.columns.iter().filter(|c| c.is_primary_key).collect();
        pk_columns.len() == 1 && pk_columns[0].name == column.name && column.has_serial_type()
    }

    /// Columns that take explicit values on insert (everything except the
    /// auto primary key)
    pub fn insertable_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| !self.is_auto_primary_key(c))
            .collect()
    }

    /// Columns participating in the primary key
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_primary_key).collect()
    }

    /// Union of all columns covered by a UNIQUE constraint or a unique index
    pub fn unique_columns(&self) -> HashSet<String> {
        let mut unique = HashSet::new();
        for constraint in &self.constraints {
            if constraint.kind == ConstraintType::Unique {
                unique.extend(constraint.columns.iter().cloned());
            }
        }
        for index in &self.indexes {
            if index.unique {
                unique.extend(index.columns.iter().cloned());
            }
        }
        unique
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A redundant-but-explicit relationship entry, used for layout and test
/// generation. Every FK column is expected to have a matching entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub from_table: String,
    pub to_table: String,
    pub from_column: String,
    pub to_column: String,
    pub cardinality: Cardinality,
    pub required: bool,
    pub on_delete: OnDeleteAction,
}

/// The full relational schema under verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered table list
    pub tables: Vec<Table>,

    /// Explicit relationship list
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Schema {
    /// Parse a designer JSON payload
    pub fn from_json(payload: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Cross-reference check for caller-supplied schemas: non-empty names,
    /// and every relationship endpoint resolving to an existing
    /// table/column. The engine itself never calls this; it runs at the
    /// ingestion boundary.
    pub fn validate(&self) -> CoreResult<()> {
        for table in &self.tables {
            if table.name.trim().is_empty() {
                return Err(CoreError::EmptyName {
                    context: format!("table {}", table.id),
                });
            }
            for column in &table.columns {
                if column.name.trim().is_empty() {
                    return Err(CoreError::EmptyName {
                        context: format!("column on table {}", table.name),
                    });
                }
            }
        }

        for relationship in &self.relationships {
            let from = self.table(&relationship.from_table).ok_or_else(|| {
                CoreError::UnknownTable {
                    name: relationship.from_table.clone(),
                }
            })?;
            let to = self.table(&relationship.to_table).ok_or_else(|| {
                CoreError::UnknownTable {
                    name: relationship.to_table.clone(),
                }
            })?;
            if from.column(&relationship.from_column).is_none() {
                return Err(CoreError::UnknownColumn {
                    table: from.name.clone(),
                    column: relationship.from_column.clone(),
                });
            }
            if to.column(&relationship.to_column).is_none() {
                return Err(CoreError::UnknownColumn {
                    table: to.name.clone(),
                    column: relationship.to_column.clone(),
                });
            }
        }

        Ok(())
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Set of all table names, used to detect dangling FK references
    pub fn table_names(&self) -> HashSet<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
