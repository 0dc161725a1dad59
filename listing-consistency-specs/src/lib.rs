//! Fixture-driven scenario testing for listing-consistency.
//!
//! Each fixture under `fixtures/` is a TOML file holding regional listings of
//! one product and a list of check expressions about the resulting
//! [`ProductReport`](listing_consistency_check::ProductReport). The harness
//! runs every fixture and reports any failing check that the
//! expected-failures ledger does not list.
//!
//! ## Modules
//!
//! - [`fixture`] - Fixture and check types
//! - [`parser`] - Parses fixtures and check expressions
//! - [`loader`] - Loads fixture files from disk
//! - [`matcher`] - Resolves report fields and compares values
//! - [`runner`] - Runs fixtures and the whole harness
//! - [`formatter`] - Failure reports
//! - [`failures`] - Expected failures tracking via TOML
//! - [`errors`] - Error types

pub mod config;
pub mod errors;
pub mod failures;
pub mod fixture;
pub mod formatter;
pub mod loader;
pub mod matcher;
pub mod parser;
pub mod runner;

pub use config::HarnessConfig;
pub use errors::{SpecError, SpecResult};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult};
pub use fixture::{Check, CompareOp, ScenarioFixture};
pub use formatter::{format_failure, format_summary};
pub use loader::{load_all_fixtures, load_fixture};
pub use matcher::{
    check_field, compare, resolve_field, CheckOutcome, CheckResult, MatchResult, Value,
    NUMERIC_TOLERANCE,
};
pub use parser::{parse_check, parse_fixture};
pub use runner::{check_fixture, run_fixture, run_harness};

#[cfg(test)]
mod tests;
