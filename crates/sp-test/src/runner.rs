//! Savepoint-isolated test execution
//!
//! Compiles the schema, seeds a fresh sandbox, runs every generated test
//! inside its own savepoint, and folds the outcomes into a report. Failing
//! tests become open incidents; everything below the sandbox boundary is
//! recovered into per-test results rather than aborting the run.

use crate::error::RunResult;
use crate::generator::generate_chaos_tests;
use crate::seed::{seed_database, SeedOptions};
use serde::{Deserialize, Serialize};
use sp_core::schema::Schema;
use sp_core::sql_utils::quote_ident;
use sp_core::{ExpectedResult, Incident, TestCase, TestResult};
use sp_db::Sandbox;
use sp_sql::compile_schema;
use std::time::Instant;

/// Rows shown per table in the seed preview
const SEED_PREVIEW_ROWS: usize = 8;

/// Sample of seeded data for one table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPreviewTable {
    /// Table name
    pub table: String,

    /// Column names of the sample
    pub columns: Vec<String>,

    /// Up to the first eight rows
    pub rows: Vec<Vec<serde_json::Value>>,

    /// Total seeded row count for the table
    pub total_rows: i64,
}

/// Complete outcome of one verification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Number of generated tests
    pub total_tests: usize,

    /// Tests whose outcome matched the expectation
    pub passed_count: usize,

    /// Tests whose outcome did not
    pub failed_count: usize,

    /// Per-test outcomes, in generation order
    pub test_results: Vec<TestResult>,

    /// One open incident per failed test
    pub incidents: Vec<Incident>,

    /// Seeded-data samples, in schema order
    pub seed_preview: Vec<SeedPreviewTable>,

    /// The compiled DDL the sandbox was built from
    pub schema_sql: String,

    /// Run start, epoch milliseconds
    pub started_at: i64,

    /// Run end, epoch milliseconds
    pub completed_at: i64,
}

/// Run the full verification pipeline against a schema.
///
/// Errors surface only for host-level failures (sandbox creation, seeding);
/// individual test failures are data in the report, not errors.
pub fn run_verification(schema: &Schema) -> RunResult<VerificationReport> {
    let started_at = chrono::Utc::now().timestamp_millis();
    let schema_sql = compile_schema(schema);
    let tests = generate_chaos_tests(schema);

    if tests.is_empty() {
        return Ok(VerificationReport {
            total_tests: 0,
            passed_count: 0,
            failed_count: 0,
            test_results: Vec::new(),
            incidents: Vec::new(),
            seed_preview: Vec::new(),
            schema_sql,
            started_at,
            completed_at: chrono::Utc::now().timestamp_millis(),
        });
    }

    let db = Sandbox::create(&schema_sql)?;
    let outcome = execute_suite(&db, schema, &tests);
    if let Err(error) = db.close() {
        log::warn!("failed to close sandbox: {error}");
    }
    let (test_results, incidents, seed_preview) = outcome?;

    let passed_count = test_results.iter().filter(|r| r.passed).count();
    let failed_count = test_results.len() - passed_count;
    log::info!(
        "verification finished: {passed_count} passed, {failed_count} failed of {}",
        tests.len()
    );

    Ok(VerificationReport {
        total_tests: tests.len(),
        passed_count,
        failed_count,
        test_results,
        incidents,
        seed_preview,
        schema_sql,
        started_at,
        completed_at: chrono::Utc::now().timestamp_millis(),
    })
}

type SuiteOutcome = (Vec<TestResult>, Vec<Incident>, Vec<SeedPreviewTable>);

fn execute_suite(db: &Sandbox, schema: &Schema, tests: &[TestCase]) -> RunResult<SuiteOutcome> {
    seed_database(db, schema, &SeedOptions::default())?;
    let seed_preview = build_seed_preview(db, schema);

    let mut test_results = Vec::with_capacity(tests.len());
    let mut incidents = Vec::new();

    for test in tests {
        let result = run_single_test(db, test, "sp");
        if !result.passed {
            incidents.push(Incident::from_failure(result.clone()));
        }
        test_results.push(result);
    }

    Ok((test_results, incidents, seed_preview))
}

fn build_seed_preview(db: &Sandbox, schema: &Schema) -> Vec<SeedPreviewTable> {
    schema
        .tables
        .iter()
        .map(|table| {
            let quoted = quote_ident(&table.name);
            let total_rows = db
                .query_scalar_i64(&format!("SELECT COUNT(*) FROM {quoted};"))
                .unwrap_or(0);

            match db.query(&format!("SELECT * FROM {quoted} LIMIT {SEED_PREVIEW_ROWS};")) {
                Ok(output) => SeedPreviewTable {
                    table: table.name.clone(),
                    columns: output.columns,
                    rows: output.rows,
                    total_rows,
                },
                Err(error) => {
                    log::warn!("seed preview query failed for {}: {error}", table.name);
                    SeedPreviewTable {
                        table: table.name.clone(),
                        columns: Vec::new(),
                        rows: Vec::new(),
                        total_rows,
                    }
                }
            }
        })
        .collect()
}

/// Execute one test inside a savepoint named `{prefix}_{test.id}`.
///
/// The savepoint is always rolled back and released afterwards, so tests
/// cannot observe each other's writes. Cleanup failures are logged and
/// swallowed; the test's own outcome stands.
pub(crate) fn run_single_test(db: &Sandbox, test: &TestCase, savepoint_prefix: &str) -> TestResult {
    let started = Instant::now();
    let savepoint = format!("{savepoint_prefix}_{}", test.id);

    if let Err(error) = db.create_savepoint(&savepoint) {
        return test_result(test, false, &test.action_sql, started, Some(error.to_string()));
    }

    let result = evaluate_test(db, test, started);

    if let Err(error) = db.rollback_to_savepoint(&savepoint) {
        log::warn!("rollback to savepoint {savepoint} failed: {error}");
    }
    if let Err(error) = db.release_savepoint(&savepoint) {
        log::warn!("release of savepoint {savepoint} failed: {error}");
    }

    result
}

fn evaluate_test(db: &Sandbox, test: &TestCase, started: Instant) -> TestResult {
    if !test.setup_sql.trim().is_empty() {
        if let Some(error) = db.try_script(&test.setup_sql) {
            return test_result(
                test,
                false,
                &test.setup_sql,
                started,
                Some(format!("Setup failed: {error}")),
            );
        }
    }

    let action_error = db.try_execute(&test.action_sql);
    let expected_success = test.expected_result == ExpectedResult::Success;
    let passed = expected_success == action_error.is_none();

    if !passed {
        let message = if expected_success {
            action_error.unwrap_or_else(|| "Expected statement to succeed".to_string())
        } else {
            "Expected statement to fail but it succeeded".to_string()
        };
        return test_result(test, false, &test.action_sql, started, Some(message));
    }

    if let (false, Some(expected)) = (expected_success, &test.expected_error) {
        let actual = action_error.as_deref().unwrap_or("no error");
        if !actual.contains(expected.as_str()) {
            return test_result(
                test,
                false,
                &test.action_sql,
                started,
                Some(format!("Expected \"{expected}\" but got \"{actual}\"")),
            );
        }
    }

    test_result(test, true, &test.action_sql, started, None)
}

fn test_result(
    test: &TestCase,
    passed: bool,
    sql: &str,
    started: Instant,
    error: Option<String>,
) -> TestResult {
    TestResult {
        test_id: test.id.clone(),
        test_name: test.name.clone(),
        category: test.category,
        passed,
        error,
        sql: sql.to_string(),
        duration_ms: started.elapsed().as_secs_f64() * 1000.0,
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
