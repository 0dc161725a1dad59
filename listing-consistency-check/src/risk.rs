//! Risk level from pairwise scores and issue counts, with product-level escalation.

use serde::Serialize;

use crate::comparison::PairwiseComparison;
use crate::issue::Severity;

/// HIGH issues across all pairs at which risk is HIGH regardless of scores.
pub const HIGH_ISSUE_OVERRIDE: usize = 5;
pub const LOW_RISK_AVERAGE: f64 = 0.55;
pub const LOW_RISK_MINIMUM: f64 = 0.30;
pub const MEDIUM_RISK_AVERAGE: f64 = 0.30;
pub const MEDIUM_RISK_MINIMUM: f64 = 0.10;

/// Overall verdict on how consistent a product's listings are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// One band up; `High` stays `High`.
    pub fn escalated(self) -> Self {
        match self {
            RiskLevel::Low => RiskLevel::Medium,
            RiskLevel::Medium | RiskLevel::High => RiskLevel::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "LOW" => Some(RiskLevel::Low),
            "MEDIUM" => Some(RiskLevel::Medium),
            "HIGH" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk from combined scores and the number of HIGH issues summed over pairs.
///
/// The issue count is checked before the score bands. No scores means there
/// is nothing to disagree, so LOW.
pub fn classify(combined_scores: &[f64], high_issue_count: usize) -> RiskLevel {
    if combined_scores.is_empty() {
        return RiskLevel::Low;
    }
    if high_issue_count >= HIGH_ISSUE_OVERRIDE {
        return RiskLevel::High;
    }

    let average = combined_scores.iter().sum::<f64>() / combined_scores.len() as f64;
    let minimum = combined_scores.iter().copied().fold(f64::INFINITY, f64::min);

    if average >= LOW_RISK_AVERAGE && minimum >= LOW_RISK_MINIMUM {
        RiskLevel::Low
    } else if average >= MEDIUM_RISK_AVERAGE && minimum >= MEDIUM_RISK_MINIMUM {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Risk of a product from its pairwise comparisons.
///
/// HIGH issues are counted per pair before de-duplication, so one conflict
/// seen from several pairs counts once per pair.
pub fn determine_risk(comparisons: &[PairwiseComparison]) -> RiskLevel {
    let scores: Vec<f64> = comparisons.iter().map(PairwiseComparison::combined).collect();
    let high_issues = comparisons
        .iter()
        .flat_map(|comparison| &comparison.issues)
        .filter(|issue| issue.severity == Severity::High)
        .count();
    classify(&scores, high_issues)
}

/// Adjust a computed level for product-level signals.
///
/// A HIGH issue lifts LOW to MEDIUM. A title mismatch escalates one more band,
/// but only together with a HIGH issue.
pub fn escalate(level: RiskLevel, has_high_issue: bool, title_mismatch: bool) -> RiskLevel {
    let mut level = level;
    if has_high_issue && level == RiskLevel::Low {
        level = RiskLevel::Medium;
    }
    if title_mismatch && has_high_issue {
        level = level.escalated();
    }
    level
}
