//! Harness configuration.

use std::path::PathBuf;

/// Where the harness finds its fixtures and its expected-failures ledger.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub fixtures_dir: PathBuf,
    pub failures_file: PathBuf,
}

impl HarnessConfig {
    /// The fixtures shipped with this crate.
    pub fn standard() -> Self {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        Self {
            fixtures_dir: root.join("fixtures"),
            failures_file: root.join("expected-failures.toml"),
        }
    }

    pub fn with_fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = dir.into();
        self
    }

    pub fn with_failures_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.failures_file = path.into();
        self
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::standard()
    }
}
