//! Core types for parsed scenario fixtures.
//!
//! A fixture is a TOML document: an optional title, a list of check
//! expressions, an optional `[config]` table and one `[[listing]]` table per
//! region in display order.
//!
//! ```toml
//! title = "Battery life differs between US and UK"
//! checks = [
//!     "issues.spec_conflict = 1",
//!     "spec.battery_life_hours.consistent = false",
//! ]
//!
//! [[listing]]
//! region = "US"
//! title = "Wireless Earbuds"
//! description = "30-hour battery, IPX4 waterproof"
//! ```

use listing_consistency_check::{CheckConfig, RegionListing};
use serde::{Deserialize, Serialize};

/// A parsed scenario fixture.
#[derive(Debug, Clone)]
pub struct ScenarioFixture {
    pub title: Option<String>,
    pub listings: Vec<RegionListing>,
    pub config: CheckConfig,
    pub checks: Vec<Check>,
}

/// The fixture as written, before check expressions are parsed.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawFixture {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub checks: Vec<String>,
    #[serde(default)]
    pub config: Option<CheckConfig>,
    #[serde(default, rename = "listing")]
    pub listings: Vec<RawListing>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawListing {
    pub region: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// One check expression, e.g. `pair.US.UK.combined >= 0.9`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// Dotted path into the product report.
    pub field: String,
    pub expected: String,
    pub operator: CompareOp,
    /// 1-based position in the fixture's `checks` list.
    pub index: usize,
}

impl Check {
    /// The expression as written, normalized: `field op expected`.
    pub fn expression(&self) -> String {
        format!("{} {} {}", self.field, self.operator, self.expected)
    }
}

/// Comparison operators for checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CompareOp {
    /// Exact equality: `field = value`
    Equals,
    /// Numeric: `field >= value`
    Gte,
    /// Numeric: `field <= value`
    Lte,
    /// Substring: `field ~= value`
    Contains,
}

impl Default for CompareOp {
    fn default() -> Self {
        CompareOp::Equals
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareOp::Equals => write!(f, "="),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lte => write!(f, "<="),
            CompareOp::Contains => write!(f, "~="),
        }
    }
}

impl ScenarioFixture {
    pub fn regions(&self) -> Vec<&str> {
        self.listings.iter().map(|l| l.region.as_str()).collect()
    }

    pub fn check_by_expression(&self, expression: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.expression() == expression)
    }
}
