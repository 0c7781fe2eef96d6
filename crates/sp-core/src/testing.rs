//! Chaos test case and result types

use serde::{Deserialize, Serialize};

/// Category of a generated test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCategory {
    HappyPath,
    EdgeCase,
    Adversarial,
    Concurrency,
}

/// Whether the probe statement is expected to succeed or be rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedResult {
    Success,
    Failure,
}

/// A single generated probe against one constraint (or one happy path).
///
/// Test cases are pure data: the generator derives them from the schema
/// alone, and the runner executes them under savepoint isolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Deterministic identifier (`test_1`, `test_2`, ...)
    pub id: String,

    /// Human-readable name, e.g. `widgets: UNIQUE constraint violation`
    pub name: String,

    /// Test category
    pub category: TestCategory,

    /// SQL run before the probe; may be empty
    pub setup_sql: String,

    /// The probe statement itself
    pub action_sql: String,

    /// Expected outcome of the probe
    pub expected_result: ExpectedResult,

    /// Substring the engine error must contain when a failure is expected.
    /// Distinguishes *which* constraint fired when the engine's message is
    /// ambiguous.
    pub expected_error: Option<String>,
}

/// Outcome of executing one test case. Created once, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Identifier of the test that ran
    pub test_id: String,

    /// Name of the test that ran
    pub test_name: String,

    /// Category of the test that ran
    pub category: TestCategory,

    /// Whether actual outcome matched the expectation
    pub passed: bool,

    /// Failure description (setup failure, wrong direction, or wrong error
    /// text); `None` when passed
    pub error: Option<String>,

    /// The SQL that ran (setup SQL when setup failed, action SQL otherwise)
    pub sql: String,

    /// Elapsed wall-clock time in milliseconds
    pub duration_ms: f64,
}
