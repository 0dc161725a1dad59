//! Product check configuration.
//!
//! Engine weights and word tables are compile-time constants in
//! `listing_consistency`; only the workflow knobs live here.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::issue::Severity;

/// Errors loading a [`CheckConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Per-severity limits applied after issues from all pairs are pooled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueCaps {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl IssueCaps {
    pub fn cap_for(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

impl Default for IssueCaps {
    fn default() -> Self {
        IssueCaps {
            high: 20,
            medium: 15,
            low: 10,
        }
    }
}

/// Configuration for [`ProductCheck`](crate::ProductCheck).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Language every description and title is translated into before comparison.
    pub target_language: String,
    /// Title pairs scoring below this are reported as mismatches.
    pub title_mismatch_threshold: f64,
    pub issue_caps: IssueCaps,
}

impl CheckConfig {
    /// Defaults: English target, 0.70 title threshold, 20/15/10 issue caps.
    pub fn standard() -> Self {
        CheckConfig {
            target_language: "en".into(),
            title_mismatch_threshold: 0.70,
            issue_caps: IssueCaps::default(),
        }
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    ///
    /// ```
    /// use listing_consistency_check::CheckConfig;
    ///
    /// let config = CheckConfig::from_toml_str("target_language = \"de\"").unwrap();
    /// assert_eq!(config.target_language, "de");
    /// assert_eq!(config.issue_caps.high, 20);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file. A file that does not exist yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::standard()),
            Err(source) => Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self::standard()
    }
}
