//! Resolving check fields against a product report and comparing values.
//!
//! Field paths are dotted. The first segment picks the area of the report:
//!
//! | path | value |
//! |------|-------|
//! | `risk` | `LOW`, `MEDIUM` or `HIGH` |
//! | `confidence` | overall confidence |
//! | `issues.total`, `issues.high`, `issues.medium`, `issues.low` | counts |
//! | `issues.<kind>` | count of one issue kind, e.g. `issues.spec_conflict` |
//! | `issues.titles` | list of issue titles |
//! | `pair.<R1>.<R2>.<signal>` | one similarity signal, or `combined` |
//! | `pair.<R1>.<R2>.confidence` / `.issues` | pair confidence / issue count |
//! | `title.mismatch` / `title.mismatches` | flag / number of mismatched pairs |
//! | `spec.<name>.consistent` / `spec.<name>.<REGION>` | flag / value |
//! | `stats.average`, `stats.min`, `stats.max` | similarity statistics |
//! | `language.<REGION>` / `language.<REGION>.translated` | detected code / flag |

use std::fmt;

use listing_consistency::SimilarityScores;
use listing_consistency_check::{IssueKind, ProductReport, Severity};

use crate::fixture::{Check, CompareOp};

/// Tolerance for numeric equality; scores are rounded to four digits.
pub const NUMERIC_TOLERANCE: f64 = 5e-5;

/// A value read out of a report.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    List(Vec<String>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(text) => write!(f, "{}", text),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Aggregated results for one fixture.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    pub passed: Vec<CheckResult>,
    pub failed: Vec<CheckResult>,
}

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub check: Check,
    pub outcome: CheckOutcome,
}

/// Outcome of a check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Passed,
    Failed { expected: String, actual: String },
    /// The field does not exist in the report, or the operator does not
    /// apply to its value.
    Unresolved { reason: String },
}

impl CheckOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, CheckOutcome::Passed)
    }
}

impl MatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, check: Check, outcome: CheckOutcome) {
        let result = CheckResult { check, outcome };
        if result.outcome == CheckOutcome::Passed {
            self.passed.push(result);
        } else {
            self.failed.push(result);
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

/// Read the value at `field` from `report`.
pub fn resolve_field(report: &ProductReport, field: &str) -> Result<Value, String> {
    let parts: Vec<&str> = field.split('.').collect();
    match parts.as_slice() {
        ["risk"] => Ok(Value::Text(report.risk_level.as_str().to_string())),
        ["confidence"] => Ok(Value::Text(report.confidence.to_string())),
        ["issues", rest] => resolve_issues(report, rest),
        ["pair", region_1, region_2, signal] => {
            let pair = report
                .pair(region_1, region_2)
                .ok_or_else(|| format!("no comparison between {} and {}", region_1, region_2))?;
            match *signal {
                "confidence" => Ok(Value::Text(pair.confidence().to_string())),
                "issues" => Ok(Value::Number(pair.issues.len() as f64)),
                name => score_by_name(&pair.similarity.scores, name)
                    .map(Value::Number)
                    .ok_or_else(|| format!("unknown signal {:?}", name)),
            }
        }
        ["title", "mismatch"] => Ok(Value::Bool(report.title_analysis.is_mismatch)),
        ["title", "mismatches"] => Ok(Value::Number(
            report.title_analysis.mismatches.len() as f64,
        )),
        ["spec", name, key] => {
            let entry = report
                .spec_analysis
                .get(*name)
                .ok_or_else(|| format!("spec {:?} not found in any region", name))?;
            if *key == "consistent" {
                Ok(Value::Bool(entry.consistent))
            } else {
                entry
                    .value_for(key)
                    .map(|value| Value::Text(value.to_string()))
                    .ok_or_else(|| format!("spec {:?} has no value for {}", name, key))
            }
        }
        ["stats", stat] => match *stat {
            "average" => Ok(Value::Number(report.statistics.average)),
            "min" => Ok(Value::Number(report.statistics.min)),
            "max" => Ok(Value::Number(report.statistics.max)),
            other => Err(format!("unknown statistic {:?}", other)),
        },
        ["language", region] => language_info(report, region)
            .map(|info| Value::Text(info.detected_language.clone())),
        ["language", region, "translated"] => {
            language_info(report, region).map(|info| Value::Bool(info.was_translated))
        }
        _ => Err(format!("unknown field {:?}", field)),
    }
}

fn resolve_issues(report: &ProductReport, key: &str) -> Result<Value, String> {
    let counts = &report.issue_counts;
    let count = match key {
        "total" => counts.total,
        "titles" => {
            return Ok(Value::List(
                report.issues.iter().map(|issue| issue.title.clone()).collect(),
            ))
        }
        other => {
            if let Some(severity) = severity_from_name(other) {
                counts.get(severity)
            } else if let Some(kind) = IssueKind::from_name(other) {
                report.issues.iter().filter(|issue| issue.kind == kind).count()
            } else {
                return Err(format!("unknown issue key {:?}", other));
            }
        }
    };
    Ok(Value::Number(count as f64))
}

fn severity_from_name(name: &str) -> Option<Severity> {
    match name {
        "high" => Some(Severity::High),
        "medium" => Some(Severity::Medium),
        "low" => Some(Severity::Low),
        _ => None,
    }
}

fn language_info<'r>(
    report: &'r ProductReport,
    region: &str,
) -> Result<&'r listing_consistency_check::LanguageInfo, String> {
    report
        .language_info
        .get(region)
        .ok_or_else(|| format!("no language info for {}", region))
}

fn score_by_name(scores: &SimilarityScores, name: &str) -> Option<f64> {
    Some(match name {
        "ngram_dice" => scores.ngram_dice,
        "bigram_jaccard" => scores.bigram_jaccard,
        "word_jaccard" => scores.word_jaccard,
        "sequence" => scores.sequence,
        "sentence_alignment" => scores.sentence_alignment,
        "feature_overlap" => scores.feature_overlap,
        "spec_match" => scores.spec_match,
        "structural" => scores.structural,
        "tfidf_cosine" => scores.tfidf_cosine,
        "combined" => scores.combined,
        _ => return None,
    })
}

/// Compare a resolved value against a check.
pub fn compare(value: &Value, check: &Check) -> CheckOutcome {
    let expected = check.expected.as_str();
    let passed = match (check.operator, value) {
        (CompareOp::Equals, Value::Number(actual)) => match expected.parse::<f64>() {
            Ok(wanted) => (actual - wanted).abs() <= NUMERIC_TOLERANCE,
            Err(_) => return not_a_number(expected),
        },
        (CompareOp::Equals, Value::Bool(actual)) => match expected {
            "true" => *actual,
            "false" => !*actual,
            other => {
                return CheckOutcome::Unresolved {
                    reason: format!("{:?} is not a boolean", other),
                }
            }
        },
        (CompareOp::Equals, Value::Text(actual)) => actual == expected,
        (CompareOp::Equals, Value::List(items)) => items.join(", ") == expected,
        (CompareOp::Gte, Value::Number(actual)) | (CompareOp::Lte, Value::Number(actual)) => {
            let wanted = match expected.parse::<f64>() {
                Ok(wanted) => wanted,
                Err(_) => return not_a_number(expected),
            };
            if check.operator == CompareOp::Gte {
                *actual + NUMERIC_TOLERANCE >= wanted
            } else {
                *actual - NUMERIC_TOLERANCE <= wanted
            }
        }
        (CompareOp::Contains, Value::Text(actual)) => actual.contains(expected),
        (CompareOp::Contains, Value::List(items)) => {
            items.iter().any(|item| item.contains(expected))
        }
        (op, value) => {
            return CheckOutcome::Unresolved {
                reason: format!("operator {} does not apply to {}", op, value),
            }
        }
    };

    if passed {
        CheckOutcome::Passed
    } else {
        CheckOutcome::Failed {
            expected: format!("{} {}", check.operator, expected),
            actual: value.to_string(),
        }
    }
}

fn not_a_number(expected: &str) -> CheckOutcome {
    CheckOutcome::Unresolved {
        reason: format!("{:?} is not a number", expected),
    }
}

/// Resolve and compare one check.
pub fn check_field(report: &ProductReport, check: &Check) -> CheckOutcome {
    match resolve_field(report, &check.field) {
        Ok(value) => compare(&value, check),
        Err(reason) => CheckOutcome::Unresolved { reason },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_check;

    fn outcome(value: Value, expression: &str) -> CheckOutcome {
        compare(&value, &parse_check(expression, 1).unwrap())
    }

    #[test]
    fn test_numeric_equality_tolerance() {
        assert_eq!(
            outcome(Value::Number(0.40004), "x = 0.4"),
            CheckOutcome::Passed
        );
        assert_eq!(
            outcome(Value::Number(0.4002), "x = 0.4"),
            CheckOutcome::Failed {
                expected: "= 0.4".to_string(),
                actual: "0.4002".to_string()
            }
        );
    }

    #[test]
    fn test_bounds() {
        assert_eq!(outcome(Value::Number(0.6), "x >= 0.55"), CheckOutcome::Passed);
        assert_eq!(outcome(Value::Number(0.55), "x >= 0.55"), CheckOutcome::Passed);
        assert!(!outcome(Value::Number(0.2), "x <= 0.1").is_passed());
    }

    #[test]
    fn test_text_and_bool() {
        assert_eq!(outcome(Value::Text("HIGH".into()), "x = HIGH"), CheckOutcome::Passed);
        assert!(!outcome(Value::Text("5.0".into()), "x = 5").is_passed());
        assert_eq!(outcome(Value::Bool(false), "x = false"), CheckOutcome::Passed);
        assert!(matches!(
            outcome(Value::Bool(false), "x = no"),
            CheckOutcome::Unresolved { .. }
        ));
    }

    #[test]
    fn test_contains() {
        let titles = Value::List(vec![
            "Battery Life Hours Differs".to_string(),
            "Content only in US".to_string(),
        ]);
        assert_eq!(outcome(titles.clone(), "x ~= Battery Life"), CheckOutcome::Passed);
        assert!(!outcome(titles, "x ~= Weight").is_passed());
    }

    #[test]
    fn test_operator_mismatch_is_unresolved() {
        assert!(matches!(
            outcome(Value::Text("HIGH".into()), "x >= 1"),
            CheckOutcome::Unresolved { .. }
        ));
        assert!(matches!(
            outcome(Value::Number(1.0), "x = many"),
            CheckOutcome::Unresolved { .. }
        ));
    }
}
