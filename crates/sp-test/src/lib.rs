//! sp-test - Chaos test generation and execution for SchemaProbe
//!
//! Pipeline pieces on top of the compiled schema: deterministic seeding in
//! foreign-key order, per-constraint chaos test synthesis, the savepoint-
//! isolated test runner, and patch re-verification.

pub mod error;
pub mod generator;
pub mod runner;
pub mod seed;
pub mod verify;

pub use error::{RunResult, TestError};
pub use generator::generate_chaos_tests;
pub use runner::{run_verification, SeedPreviewTable, VerificationReport};
pub use seed::{seed_database, SeedOptions, SeedSummary, DEFAULT_ROWS_PER_TABLE};
pub use verify::{verify_patches, PatchVerification, PatchVerificationSummary};
