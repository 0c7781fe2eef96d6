//! Schema to DDL compilation

use crate::dialect::{map_data_type, normalize_default_value, normalize_expression};
use sp_core::schema::{Column, ConstraintType, OnDeleteAction, Schema, Table};
use sp_core::sql_utils::quote_ident;
use std::collections::HashSet;

/// Compile the schema into a SQLite DDL script.
///
/// One `CREATE TABLE` per table in schema order, followed by
/// `CREATE INDEX IF NOT EXISTS` statements for every declared index.
/// Statements are separated by blank lines. Foreign keys referencing a
/// table absent from the schema are omitted entirely so a partially
/// specified schema still compiles.
pub fn compile_schema(schema: &Schema) -> String {
    let table_names = schema.table_names();

    let mut statements: Vec<String> = schema
        .tables
        .iter()
        .map(|table| build_create_table(table, &table_names))
        .collect();

    for table in &schema.tables {
        for index in &table.indexes {
            let unique_keyword = if index.unique { "UNIQUE " } else { "" };
            let columns: Vec<String> = index.columns.iter().map(|c| quote_ident(c)).collect();
            statements.push(format!(
                "CREATE {}INDEX IF NOT EXISTS {} ON {} ({});",
                unique_keyword,
                quote_ident(&index.name),
                quote_ident(&table.name),
                columns.join(", ")
            ));
        }
    }

    statements.join("\n\n")
}

/// ON DELETE clause body for an optional action
fn on_delete_sql(action: Option<OnDeleteAction>) -> &'static str {
    action.unwrap_or(OnDeleteAction::NoAction).as_sql()
}

/// The ON DELETE action declared by the FOREIGN_KEY constraint covering
/// `column`, if any
fn foreign_key_action(table: &Table, column: &Column) -> Option<OnDeleteAction> {
    table
        .constraints
        .iter()
        .find(|c| c.kind == ConstraintType::ForeignKey && c.columns.contains(&column.name))
        .and_then(|c| c.on_delete)
}

fn build_create_table(table: &Table, existing_tables: &HashSet<&str>) -> String {
    let mut definitions: Vec<String> = Vec::new();
    let mut table_constraints: Vec<String> = Vec::new();
    let mut inlined_foreign_keys: HashSet<&str> = HashSet::new();
    let primary_key_columns = table.primary_key_columns();

    for column in &table.columns {
        if table.is_auto_primary_key(column) {
            definitions.push(format!(
                "  {} INTEGER PRIMARY KEY AUTOINCREMENT",
                quote_ident(&column.name)
            ));
            continue;
        }

        let mut definition = format!(
            "  {} {}",
            quote_ident(&column.name),
            map_data_type(&column.data_type)
        );
        if !column.nullable {
            definition.push_str(" NOT NULL");
        }

        if let Some(default_value) = column
            .default_value
            .as_deref()
            .and_then(normalize_default_value)
        {
            definition.push_str(&format!(" DEFAULT {default_value}"));
        }

        if let Some((ref_table, ref_column)) = column.foreign_key_target() {
            if existing_tables.contains(ref_table) {
                definition.push_str(&format!(
                    " REFERENCES {}({}) ON DELETE {}",
                    quote_ident(ref_table),
                    quote_ident(ref_column),
                    on_delete_sql(foreign_key_action(table, column))
                ));
                inlined_foreign_keys.insert(column.name.as_str());
            }
        }

        definitions.push(definition);
    }

    let has_inline_auto_pk = primary_key_columns
        .iter()
        .any(|column| table.is_auto_primary_key(column));
    if !has_inline_auto_pk && !primary_key_columns.is_empty() {
        let columns: Vec<String> = primary_key_columns
            .iter()
            .map(|column| quote_ident(&column.name))
            .collect();
        table_constraints.push(format!("  PRIMARY KEY ({})", columns.join(", ")));
    }

    for constraint in &table.constraints {
        match constraint.kind {
            ConstraintType::Unique if !constraint.columns.is_empty() => {
                let columns: Vec<String> =
                    constraint.columns.iter().map(|c| quote_ident(c)).collect();
                table_constraints.push(format!("  UNIQUE ({})", columns.join(", ")));
            }
            ConstraintType::Check => {
                if let Some(expression) = &constraint.expression {
                    table_constraints
                        .push(format!("  CHECK ({})", normalize_expression(expression)));
                }
            }
            ConstraintType::ForeignKey if !constraint.columns.is_empty() => {
                let column_name = constraint.columns[0].as_str();
                if inlined_foreign_keys.contains(column_name) {
                    continue;
                }

                let Some(column) = table.column(column_name) else {
                    continue;
                };
                if let Some((ref_table, ref_column)) = column.foreign_key_target() {
                    if existing_tables.contains(ref_table) {
                        table_constraints.push(format!(
                            "  FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE {}",
                            quote_ident(&column.name),
                            quote_ident(ref_table),
                            quote_ident(ref_column),
                            on_delete_sql(constraint.on_delete)
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    definitions.extend(table_constraints);
    format!(
        "CREATE TABLE {} (\n{}\n);",
        quote_ident(&table.name),
        definitions.join(",\n")
    )
}

#[cfg(test)]
#[path = "compiler_test.rs"]
mod tests;
