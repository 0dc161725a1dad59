//! Error types for the scenario harness.

use thiserror::Error;

/// Errors that can occur while loading or checking scenario fixtures.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A check expression that does not parse. `check` is 1-based.
    #[error("parse error in check {check}: {message}")]
    Parse { check: usize, message: String },

    /// A fixture or ledger file that cannot be read or is not valid TOML.
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },

    /// A fixture that parses but cannot be run.
    #[error("invalid fixture: {message}")]
    Invalid { message: String },
}

pub type SpecResult<T> = Result<T, SpecError>;
