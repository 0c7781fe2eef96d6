//! Incidents and remediation patches
//!
//! An incident records one failing test. The engine creates incidents (status
//! `Open`) and the patch verifier annotates patch verification fields; the
//! `Fixing`/`Fixed`/`WontFix` transitions belong to the external remediation
//! workflow, never to this engine.

use crate::testing::TestResult;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Open,
    Fixing,
    Fixed,
    WontFix,
}

/// A recorded failing test awaiting remediation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// `incident_` + the failing test's id
    pub id: String,

    /// Copy of the failing result
    pub test_result: TestResult,

    /// Current status
    pub status: IncidentStatus,

    /// Root-cause analysis, filled in by the external workflow
    #[serde(default)]
    pub root_cause: Option<String>,

    /// Suggested fix text, filled in by the external workflow
    #[serde(default)]
    pub suggested_fix: Option<String>,

    /// Attached patch, filled in by the external workflow
    #[serde(default)]
    pub patch: Option<Patch>,

    /// Creation time, epoch milliseconds
    pub created_at: i64,

    /// Resolution time, epoch milliseconds
    #[serde(default)]
    pub fixed_at: Option<i64>,
}

impl Incident {
    /// Record a failing test as a fresh open incident
    pub fn from_failure(result: TestResult) -> Self {
        Self {
            id: format!("incident_{}", result.test_id),
            test_result: result,
            status: IncidentStatus::Open,
            root_cause: None,
            suggested_fix: None,
            patch: None,
            created_at: chrono::Utc::now().timestamp_millis(),
            fixed_at: None,
        }
    }
}

/// Externally generated SQL intended to resolve one incident.
///
/// The migration SQL is immutable once constructed; the verifier only
/// annotates `verified` / `verification_error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patch {
    /// Id of the incident this patch targets
    pub incident_id: String,

    /// Root cause as diagnosed by the generator
    pub root_cause: String,

    /// Fix category tag (e.g. `add_constraint`, `add_trigger`)
    pub fix_category: String,

    /// One or more DDL/DML statements
    pub migration_sql: String,

    /// Human-readable explanation
    pub explanation: String,

    /// Description of the expected post-fix behavior
    pub expected_after_fix: String,

    /// Schema snapshot before the fix, for diffing
    #[serde(default)]
    pub before_schema_sql: Option<String>,

    /// Schema snapshot after the fix, for diffing
    #[serde(default)]
    pub after_schema_sql: Option<String>,

    /// Set by the verifier: patch applied cleanly and the targeted test now
    /// passes
    #[serde(default)]
    pub verified: Option<bool>,

    /// Set by the verifier: application error or the targeted test's failure
    /// text
    #[serde(default)]
    pub verification_error: Option<String>,
}

impl Patch {
    /// The id of the test this patch targets, derived from the incident id
    /// convention (`incident_test_7` -> `test_7`). Returns `None` for ids
    /// that do not follow the convention.
    pub fn target_test_id(&self) -> Option<&str> {
        self.incident_id.strip_prefix("incident_")
    }
}
