//! Patch re-verification
//!
//! Rebuilds a fresh seeded sandbox from the unmodified schema, applies each
//! patch's migration SQL, then re-runs the full generated suite. A patch is
//! verified only when its migration applied cleanly and the test behind its
//! incident now passes. Patches are never mutated in place; the summary
//! carries annotated copies.

use crate::error::RunResult;
use crate::generator::generate_chaos_tests;
use crate::runner::run_single_test;
use crate::seed::{seed_database, SeedOptions};
use serde::{Deserialize, Serialize};
use sp_core::schema::Schema;
use sp_core::{Patch, TestResult};
use sp_db::Sandbox;
use sp_sql::compile_schema;
use std::collections::HashMap;

/// Outcome of applying and checking one patch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchVerification {
    /// The patch, with `verified` / `verification_error` filled in
    pub patch: Patch,

    /// Whether the migration SQL executed without error
    pub applied: bool,

    /// The migration error, when it did not
    pub error: Option<String>,
}

/// Outcome of a full re-verification run over a patched sandbox
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchVerificationSummary {
    /// Per-test outcomes after all patches were applied
    pub test_results: Vec<TestResult>,

    /// Tests that passed post-patch
    pub passed_count: usize,

    /// Tests that failed post-patch
    pub failed_count: usize,

    /// Number of tests in the regenerated suite
    pub total_tests: usize,

    /// One entry per input patch, in input order
    pub patch_verifications: Vec<PatchVerification>,

    /// Post-patch results keyed by test id, for incident cross-referencing
    pub test_result_by_id: HashMap<String, TestResult>,
}

/// Apply `patches` to a freshly seeded sandbox and re-run the suite.
///
/// Migration failures do not abort the run; the failing patch is marked
/// unverified and the remaining patches still apply. The suite is
/// regenerated from the same schema, so test ids line up with the original
/// verification run and with incident ids.
pub fn verify_patches(schema: &Schema, patches: &[Patch]) -> RunResult<PatchVerificationSummary> {
    let schema_sql = compile_schema(schema);
    let db = Sandbox::create(&schema_sql)?;
    let outcome = verify_on_sandbox(&db, schema, patches);
    if let Err(error) = db.close() {
        log::warn!("failed to close verification sandbox: {error}");
    }
    outcome
}

fn verify_on_sandbox(
    db: &Sandbox,
    schema: &Schema,
    patches: &[Patch],
) -> RunResult<PatchVerificationSummary> {
    seed_database(db, schema, &SeedOptions::default())?;

    let mut applications = Vec::with_capacity(patches.len());
    for patch in patches {
        let error = db.try_script(&patch.migration_sql);
        if let Some(message) = &error {
            log::warn!("patch for {} failed to apply: {message}", patch.incident_id);
        }
        applications.push((patch, error));
    }

    let tests = generate_chaos_tests(schema);
    let mut test_results = Vec::with_capacity(tests.len());
    let mut test_result_by_id = HashMap::with_capacity(tests.len());

    for test in &tests {
        let result = run_single_test(db, test, "verify");
        test_result_by_id.insert(test.id.clone(), result.clone());
        test_results.push(result);
    }

    let patch_verifications = applications
        .into_iter()
        .map(|(patch, error)| annotate(patch, error, &test_result_by_id))
        .collect();

    let passed_count = test_results.iter().filter(|r| r.passed).count();
    let failed_count = test_results.len() - passed_count;

    Ok(PatchVerificationSummary {
        test_results,
        passed_count,
        failed_count,
        total_tests: tests.len(),
        patch_verifications,
        test_result_by_id,
    })
}

/// Fill in the patch's verification fields from the application outcome and
/// the post-patch result of its targeted test.
fn annotate(
    patch: &Patch,
    application_error: Option<String>,
    results_by_id: &HashMap<String, TestResult>,
) -> PatchVerification {
    let mut annotated = patch.clone();
    let applied = application_error.is_none();

    if !applied {
        annotated.verified = Some(false);
        annotated.verification_error = application_error.clone();
        return PatchVerification {
            patch: annotated,
            applied,
            error: application_error,
        };
    }

    match patch.target_test_id().and_then(|id| results_by_id.get(id)) {
        Some(result) => {
            annotated.verified = Some(result.passed);
            annotated.verification_error = result.error.clone();
        }
        None => {
            annotated.verified = Some(false);
            annotated.verification_error = Some(format!(
                "incident id {} does not map to a generated test",
                patch.incident_id
            ));
        }
    }

    PatchVerification {
        patch: annotated,
        applied,
        error: None,
    }
}

#[cfg(test)]
#[path = "verify_test.rs"]
mod tests;
