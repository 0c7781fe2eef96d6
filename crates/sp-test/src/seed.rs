//! Deterministic seed data synthesis
//!
//! Seeds every table in foreign-key dependency order with rows that respect
//! referential and uniqueness constraints. Values are synthesized from
//! column type and name heuristics so the data looks schema-plausible by
//! construction. Insert failures are fatal: seeding assumes the compiled
//! schema is valid, unlike DDL bootstrap which degrades gracefully.

use serde::{Deserialize, Serialize};
use sp_core::schema::{Column, Schema, Table};
use sp_core::sql_utils::{sql_string_literal, InsertBuilder};
use sp_core::TableDag;
use sp_db::{DbResult, Sandbox};
use std::collections::{HashMap, HashSet};

/// Rows inserted per table when the caller does not override it
pub const DEFAULT_ROWS_PER_TABLE: usize = 6;

/// Seeding options
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Rows to insert into every table
    pub rows_per_table: usize,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            rows_per_table: DEFAULT_ROWS_PER_TABLE,
        }
    }
}

/// Diagnostic summary of a seeding pass; not consumed by control flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSummary {
    /// Rows requested per table
    pub rows_per_table: usize,

    /// Number of tables processed
    pub tables_seeded: usize,

    /// Total rows inserted
    pub inserted_rows: usize,

    /// The dependency order tables were processed in
    pub table_order: Vec<String>,
}

/// Primary-key literals captured for one seeded row, keyed by column name
type SeededRow = HashMap<String, String>;

/// Seed every table in the schema.
///
/// The captured primary-key values per table are the only state carried
/// between tables; foreign-key columns draw from them, cycling through
/// parent rows by row index.
pub fn seed_database(
    db: &Sandbox,
    schema: &Schema,
    options: &SeedOptions,
) -> DbResult<SeedSummary> {
    let table_order = TableDag::from_schema(schema).seed_order();
    let mut seeded_primary_keys: HashMap<String, Vec<SeededRow>> = HashMap::new();
    let mut inserted_rows = 0;

    for table_name in &table_order {
        let Some(table) = schema.table(table_name) else {
            continue;
        };

        let unique_columns = table.unique_columns();
        let insertable_columns = table.insertable_columns();
        let mut table_pk_rows: Vec<SeededRow> = Vec::with_capacity(options.rows_per_table);

        for row_index in 0..options.rows_per_table {
            let mut literals: SeededRow = HashMap::new();

            for column in &insertable_columns {
                let literal = foreign_key_literal(column, row_index, &seeded_primary_keys)
                    .unwrap_or_else(|| {
                        infer_column_value(&table.name, column, row_index, &unique_columns)
                    });
                literals.insert(column.name.clone(), literal);
            }

            let insert = insertable_columns
                .iter()
                .fold(InsertBuilder::new(&table.name), |builder, column| {
                    let value = literals
                        .get(&column.name)
                        .cloned()
                        .unwrap_or_else(|| "NULL".to_string());
                    builder.value(&column.name, value)
                });
            db.execute(&insert.build())?;

            table_pk_rows.push(capture_primary_keys(db, table, &literals));
            inserted_rows += 1;
        }

        log::debug!(
            "seeded {} row(s) into {}",
            options.rows_per_table,
            table.name
        );
        seeded_primary_keys.insert(table.name.clone(), table_pk_rows);
    }

    Ok(SeedSummary {
        rows_per_table: options.rows_per_table,
        tables_seeded: table_order.len(),
        inserted_rows,
        table_order,
    })
}

/// Literal for a foreign-key column, drawn from captured parent keys.
///
/// Returns `None` when the column should fall through to type-based
/// synthesis (not an FK, no parent rows and not nullable).
fn foreign_key_literal(
    column: &Column,
    row_index: usize,
    seeded_primary_keys: &HashMap<String, Vec<SeededRow>>,
) -> Option<String> {
    let (ref_table, ref_column) = column.foreign_key_target()?;

    if let Some(parent_rows) = seeded_primary_keys.get(ref_table) {
        if !parent_rows.is_empty() {
            let parent_row = &parent_rows[row_index % parent_rows.len()];
            if let Some(value) = parent_row.get(ref_column) {
                return Some(value.clone());
            }
        }
    }

    if column.nullable {
        return Some("NULL".to_string());
    }

    None
}

/// Capture the primary-key literals of the row just inserted: the auto
/// primary key from the engine, everything else from the synthesized
/// literals.
fn capture_primary_keys(db: &Sandbox, table: &Table, literals: &SeededRow) -> SeededRow {
    let mut captured = SeededRow::new();

    for column in table.primary_key_columns() {
        if table.is_auto_primary_key(column) {
            captured.insert(column.name.clone(), db.last_insert_rowid().to_string());
        } else if let Some(value) = literals.get(&column.name) {
            captured.insert(column.name.clone(), value.clone());
        }
    }

    captured
}

/// Synthesize a literal for one column from type and name heuristics
fn infer_column_value(
    table_name: &str,
    column: &Column,
    row_index: usize,
    unique_columns: &HashSet<String>,
) -> String {
    let upper_type = column.data_type.to_uppercase();
    let name = column.name.to_lowercase();
    let is_unique = unique_columns.contains(&column.name);

    if name.ends_with("_at")
        || name.contains("date")
        || upper_type.contains("DATE")
        || upper_type.contains("TIME")
    {
        return "CURRENT_TIMESTAMP".to_string();
    }

    if upper_type.contains("BOOL") || name.starts_with("is_") || name.starts_with("has_") {
        return if row_index % 2 == 0 { "1" } else { "0" }.to_string();
    }

    if column.has_integer_type() || upper_type.contains("NUMERIC") || upper_type.contains("DECIMAL")
    {
        return infer_numeric_value(&name, row_index, is_unique);
    }

    if upper_type.contains("FLOAT") || upper_type.contains("DOUBLE") || upper_type.contains("REAL")
    {
        return format!("{}", (row_index + 1) as f64 * 9.75);
    }

    infer_string_value(table_name, &name, row_index, is_unique)
}

/// Numeric heuristics: money-like and inventory-like columns get plausible
/// magnitudes; unique columns get a monotonically increasing offset so rows
/// never collide.
fn infer_numeric_value(name: &str, row_index: usize, is_unique: bool) -> String {
    if name.contains("price")
        || name.contains("cost")
        || name.contains("amount")
        || name.contains("total")
    {
        return format!("{}", (row_index + 1) as f64 * 12.5);
    }
    if name.contains("quantity") || name.contains("stock") || name.contains("count") {
        return format!("{}", row_index + 10);
    }
    if is_unique {
        return format!("{}", 1000 + row_index);
    }
    format!("{}", row_index + 1)
}

fn infer_string_value(table_name: &str, name: &str, row_index: usize, is_unique: bool) -> String {
    if name.contains("email") {
        return sql_string_literal(&format!("user{}@example.com", row_index + 1));
    }
    if name.contains("phone") {
        return sql_string_literal(&format!("+1-555-01{:02}", row_index + 10));
    }
    if name.contains("sku") || name.contains("code") {
        return sql_string_literal(&format!(
            "{}-{}",
            table_prefix(table_name),
            row_index + 1000
        ));
    }
    if name.contains("status") {
        let statuses = ["active", "pending", "archived"];
        return sql_string_literal(statuses[row_index % statuses.len()]);
    }
    if name.contains("description") {
        return sql_string_literal(&format!(
            "Sample description {} for {}",
            row_index + 1,
            table_name
        ));
    }
    if name.contains("name") {
        return sql_string_literal(&format!(
            "{} {}",
            table_name.replace('_', " "),
            row_index + 1
        ));
    }
    if name.contains("uuid") {
        return sql_string_literal(&format!(
            "00000000-0000-4000-8000-{:012}",
            100_000_000_000u64 + row_index as u64
        ));
    }
    if is_unique {
        return sql_string_literal(&format!("{}_{}_{}", table_name, name, row_index + 1));
    }
    sql_string_literal(&format!("sample_{}_{}", name, row_index + 1))
}

/// Uppercased three-character table prefix for SKU-style codes
fn table_prefix(table_name: &str) -> String {
    table_name.chars().take(3).collect::<String>().to_uppercase()
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;
