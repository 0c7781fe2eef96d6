//! Chaos test synthesis
//!
//! Derives one probe per enforceable constraint plus a happy-path insert per
//! table, purely from the schema. Generation is deterministic: the same
//! schema always yields the same test list, ids included, so incident ids
//! stay stable across runs and patches can target them.

use sp_core::schema::{Column, ConstraintType, Schema, Table, TableConstraint};
use sp_core::sql_utils::{quote_ident, sql_string_literal, InsertBuilder};
use sp_core::{ExpectedResult, TestCase, TestCategory};
use std::collections::HashMap;

/// Generate the full chaos suite for a schema.
///
/// Tests run against a pre-seeded database and are isolated via savepoints,
/// so adversarial probes can rely on seed rows existing (the UNIQUE probe
/// duplicates one via a correlated subquery).
pub fn generate_chaos_tests(schema: &Schema) -> Vec<TestCase> {
    let mut tests = Vec::new();
    let mut counter = 1usize;

    for table in &schema.tables {
        let insertable = table.insertable_columns();

        if insertable.is_empty() {
            tests.push(TestCase {
                id: next_id(&mut counter),
                name: format!("{}: default insert (happy path)", table.name),
                category: TestCategory::HappyPath,
                setup_sql: String::new(),
                action_sql: InsertBuilder::new(&table.name).build(),
                expected_result: ExpectedResult::Success,
                expected_error: None,
            });
            continue;
        }

        for constraint in &table.constraints {
            if constraint.kind != ConstraintType::Unique {
                continue;
            }
            let id = next_id(&mut counter);
            tests.push(TestCase {
                name: format!("{}: UNIQUE constraint violation", table.name),
                category: TestCategory::Adversarial,
                setup_sql: String::new(),
                action_sql: unique_violation_sql(table, constraint, counter),
                expected_result: ExpectedResult::Failure,
                expected_error: Some("UNIQUE constraint failed".to_string()),
                id,
            });
        }

        for column in not_null_columns(&insertable) {
            let id = next_id(&mut counter);
            tests.push(TestCase {
                name: format!("{}: NOT NULL violation on {}", table.name, column.name),
                category: TestCategory::Adversarial,
                setup_sql: String::new(),
                action_sql: single_override_sql(table, counter, column, "NULL".to_string()),
                expected_result: ExpectedResult::Failure,
                expected_error: Some("NOT NULL constraint failed".to_string()),
                id,
            });
        }

        for column in insertable.iter().copied().filter(|c| c.is_foreign_key) {
            let id = next_id(&mut counter);
            tests.push(TestCase {
                name: format!("{}: FK violation on {}", table.name, column.name),
                category: TestCategory::Adversarial,
                setup_sql: String::new(),
                action_sql: single_override_sql(
                    table,
                    counter,
                    column,
                    invalid_foreign_key_literal(column),
                ),
                expected_result: ExpectedResult::Failure,
                expected_error: Some("FOREIGN KEY constraint failed".to_string()),
                id,
            });
        }

        for constraint in &table.constraints {
            if constraint.kind != ConstraintType::Check || constraint.expression.is_none() {
                continue;
            }
            let Some(action_sql) = check_violation_sql(table, constraint, counter + 1) else {
                continue;
            };
            tests.push(TestCase {
                id: next_id(&mut counter),
                name: format!("{}: CHECK constraint violation", table.name),
                category: TestCategory::Adversarial,
                setup_sql: String::new(),
                action_sql,
                expected_result: ExpectedResult::Failure,
                expected_error: Some("CHECK constraint failed".to_string()),
            });
        }

        if !skip_valid_insert(table) {
            let id = next_id(&mut counter);
            tests.push(TestCase {
                name: format!("{}: valid insert", table.name),
                category: TestCategory::HappyPath,
                setup_sql: String::new(),
                action_sql: insert_statement(table, counter + 1000, &HashMap::new()),
                expected_result: ExpectedResult::Success,
                expected_error: None,
                id,
            });
        }
    }

    tests
}

fn next_id(counter: &mut usize) -> String {
    let id = format!("test_{counter}");
    *counter += 1;
    id
}

/// Insertable columns that must be provided explicitly (no NULL, no default)
fn not_null_columns<'a>(insertable: &'a [&'a Column]) -> impl Iterator<Item = &'a Column> {
    insertable.iter().copied().filter(|column| {
        !column.nullable && column.default_value.as_deref().unwrap_or("").is_empty()
    })
}

/// A full-row insert with per-column overrides; non-overridden FK columns
/// borrow an existing parent key via a correlated subquery.
fn insert_statement(table: &Table, variant: usize, overrides: &HashMap<String, String>) -> String {
    table
        .insertable_columns()
        .iter()
        .fold(InsertBuilder::new(&table.name), |builder, column| {
            let value = match overrides.get(&column.name) {
                Some(explicit) => explicit.clone(),
                None => default_column_value(column, &table.name, variant),
            };
            builder.value(&column.name, value)
        })
        .build()
}

fn default_column_value(column: &Column, table_name: &str, variant: usize) -> String {
    if let Some((ref_table, ref_column)) = column.foreign_key_target() {
        return existing_value_subquery(ref_table, ref_column);
    }
    infer_valid_literal(column, table_name, variant)
}

fn existing_value_subquery(table: &str, column: &str) -> String {
    format!(
        "(SELECT {} FROM {} LIMIT 1)",
        quote_ident(column),
        quote_ident(table)
    )
}

fn unique_violation_sql(table: &Table, constraint: &TableConstraint, variant: usize) -> String {
    let overrides: HashMap<String, String> = constraint
        .columns
        .iter()
        .map(|name| (name.clone(), existing_value_subquery(&table.name, name)))
        .collect();
    insert_statement(table, variant, &overrides)
}

fn single_override_sql(table: &Table, variant: usize, column: &Column, value: String) -> String {
    let overrides = HashMap::from([(column.name.clone(), value)]);
    insert_statement(table, variant, &overrides)
}

/// CHECK probe targeting the first insertable column the constraint covers.
/// Returns `None` when the constraint only covers non-insertable columns.
fn check_violation_sql(table: &Table, constraint: &TableConstraint, variant: usize) -> Option<String> {
    let insertable = table.insertable_columns();
    let target = constraint
        .columns
        .iter()
        .find_map(|name| insertable.iter().copied().find(|c| &c.name == name))?;

    Some(single_override_sql(
        table,
        variant,
        target,
        check_violation_literal(target),
    ))
}

fn invalid_foreign_key_literal(column: &Column) -> String {
    if column.has_integer_type() {
        return "-999999".to_string();
    }
    sql_string_literal("__missing_fk_reference__")
}

/// A value that violates common range/length CHECK expressions for the
/// column's type class
fn check_violation_literal(column: &Column) -> String {
    let upper = column.data_type.to_uppercase();
    if column.has_integer_type() || upper.contains("NUMERIC") || upper.contains("DECIMAL") {
        return "-1".to_string();
    }
    if upper.contains("BOOL") {
        return "0".to_string();
    }
    sql_string_literal("")
}

/// Pure junction tables (a UNIQUE constraint whose columns are all foreign
/// keys) get no generic valid insert; any synthesized FK combination would
/// collide with a seeded pairing.
fn skip_valid_insert(table: &Table) -> bool {
    table.constraints.iter().any(|constraint| {
        constraint.kind == ConstraintType::Unique
            && !constraint.columns.is_empty()
            && constraint.columns.iter().all(|name| {
                table
                    .column(name)
                    .is_some_and(|column| column.is_foreign_key)
            })
    })
}

/// Literal synthesis for happy-path inserts. Distinct magnitudes and prefixes
/// from the seeder so generated probes never collide with seed rows on
/// unique columns.
fn infer_valid_literal(column: &Column, table_name: &str, variant: usize) -> String {
    let name = column.name.to_lowercase();
    let upper_type = column.data_type.to_uppercase();

    if name.ends_with("_at")
        || name.contains("date")
        || upper_type.contains("DATE")
        || upper_type.contains("TIME")
    {
        return "CURRENT_TIMESTAMP".to_string();
    }

    if upper_type.contains("BOOL") || name.starts_with("is_") || name.starts_with("has_") {
        return if variant % 2 == 0 { "1" } else { "0" }.to_string();
    }

    if column.has_integer_type() {
        if name.contains("quantity") || name.contains("stock") || name.contains("count") {
            return format!("{}", variant + 100);
        }
        if name.contains("price") || name.contains("cost") || name.contains("amount") || name.contains("total") {
            return format!("{}", variant + 25);
        }
        return format!("{}", variant + 10);
    }

    if upper_type.contains("NUMERIC")
        || upper_type.contains("DECIMAL")
        || upper_type.contains("REAL")
        || upper_type.contains("FLOAT")
    {
        return format!("{}", (variant + 1) as f64 * 17.5);
    }

    if name.contains("email") {
        return sql_string_literal(&format!("qa+{}_{}@example.com", table_name, variant));
    }
    if name.contains("sku") || name.contains("code") {
        return sql_string_literal(&format!(
            "{}-{}",
            table_name.chars().take(3).collect::<String>().to_uppercase(),
            variant + 2000
        ));
    }
    if name.contains("status") {
        return sql_string_literal("active");
    }
    if name.contains("name") {
        return sql_string_literal(&format!(
            "{} test {}",
            table_name.replace('_', " "),
            variant
        ));
    }
    if name.contains("description") {
        return sql_string_literal(&format!("Generated test payload {variant}"));
    }

    sql_string_literal(&format!("{}_{}_{}", table_name, column.name, variant))
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
