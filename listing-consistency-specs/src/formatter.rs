//! Failure reports for fixture checks.

use std::fmt::{self, Write};

use listing_consistency_check::ProductReport;

use crate::failures::ExpectedFailures;
use crate::matcher::{CheckOutcome, CheckResult};

/// Format a failed check with the report context needed to debug it.
pub fn format_failure(fixture_name: &str, result: &CheckResult, report: &ProductReport) -> String {
    let mut output = String::new();
    // writing to a String cannot fail
    let _ = write_failure(&mut output, fixture_name, result, report);
    output
}

fn write_failure(
    output: &mut String,
    fixture_name: &str,
    result: &CheckResult,
    report: &ProductReport,
) -> fmt::Result {
    let check = &result.check;
    writeln!(
        output,
        "\nFAIL: {}:{}",
        fixture_name,
        ExpectedFailures::format_ref(check.index)
    )?;
    writeln!(output)?;
    writeln!(output, "  check: {}", check.expression())?;

    match &result.outcome {
        CheckOutcome::Failed { expected, actual } => {
            writeln!(output, "    \u{2717} expected `{}`, found `{}`", expected, actual)?;
        }
        CheckOutcome::Unresolved { reason } => {
            writeln!(output, "    unresolved: {}", reason)?;
        }
        CheckOutcome::Passed => {
            writeln!(output, "  (passed)")?;
        }
    }

    writeln!(output)?;
    writeln!(
        output,
        "  regions: {}  risk: {}  issues: {}",
        report.regions_analyzed.join(", "),
        report.risk_level,
        report.issue_counts.total
    )?;
    for issue in &report.issues {
        writeln!(output, "    {}", issue)?;
    }

    if let Some(hint) = generate_hint(result, report) {
        writeln!(output)?;
        writeln!(output, "  hint: {}", hint)?;
    }
    Ok(())
}

/// Format a per-fixture summary line.
pub fn format_summary(
    fixture_name: &str,
    passed: usize,
    failed: usize,
    expected_failures: usize,
    regressions: usize,
) -> String {
    let status = if regressions > 0 { "FAIL" } else { "PASS" };
    format!(
        "\n{}: {}\n  {} passed, {} failed ({} expected, {} regressions)\n",
        status, fixture_name, passed, failed, expected_failures, regressions
    )
}

fn generate_hint(result: &CheckResult, report: &ProductReport) -> Option<String> {
    let field = result.check.field.as_str();
    match &result.outcome {
        CheckOutcome::Failed { .. } if field == "risk" && report.issue_counts.high > 0 => {
            Some(format!(
                "{} high severity issue(s) can escalate risk beyond the similarity scores",
                report.issue_counts.high
            ))
        }
        CheckOutcome::Unresolved { .. } if field.starts_with("spec.") => {
            let known: Vec<&str> = report.spec_analysis.keys().map(String::as_str).collect();
            Some(format!("specs found: {}", known.join(", ")))
        }
        CheckOutcome::Unresolved { .. } if field.starts_with("pair.") => {
            let pairs: Vec<String> = report
                .comparisons
                .iter()
                .map(|c| format!("{}.{}", c.region_1, c.region_2))
                .collect();
            Some(format!("pairs compared: {}", pairs.join(", ")))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_check;
    use listing_consistency_check::{PassthroughTranslator, ProductCheck, RegionListing};

    fn report() -> ProductReport {
        ProductCheck::new(&PassthroughTranslator).run(
            "B0TEST",
            &[
                RegionListing::new("US", "Earbuds", "30-hour battery, IPX4 waterproof"),
                RegionListing::new("UK", "Earbuds", "20-hour battery, IPX4 waterproof"),
            ],
        )
    }

    #[test]
    fn test_format_failed_check() {
        let result = CheckResult {
            check: parse_check("risk = LOW", 1).unwrap(),
            outcome: CheckOutcome::Failed {
                expected: "= LOW".to_string(),
                actual: "MEDIUM".to_string(),
            },
        };
        let output = format_failure("battery.toml", &result, &report());

        insta::assert_snapshot!(output.trim(), @r###"
        FAIL: battery.toml:C1

          check: risk = LOW
            ✗ expected `= LOW`, found `MEDIUM`

          regions: US, UK  risk: MEDIUM  issues: 1
            [high] Battery Life Hours Differs: US: 30, UK: 20 (US, UK)

          hint: 1 high severity issue(s) can escalate risk beyond the similarity scores
        "###);
    }

    #[test]
    fn test_unresolved_spec_lists_known_specs() {
        let result = CheckResult {
            check: parse_check("spec.weight_grams.US = 250", 2).unwrap(),
            outcome: CheckOutcome::Unresolved {
                reason: "spec \"weight_grams\" not found in any region".to_string(),
            },
        };
        let output = format_failure("battery.toml", &result, &report());

        assert!(output.contains("FAIL: battery.toml:C2"));
        assert!(output.contains("unresolved: spec \"weight_grams\" not found"));
        assert!(output.contains("hint: specs found: battery_life_hours, ip_rating"));
    }

    #[test]
    fn test_format_summary() {
        let output = format_summary("battery.toml", 3, 1, 1, 0);
        assert!(output.contains("PASS: battery.toml"));
        assert!(output.contains("3 passed, 1 failed (1 expected, 0 regressions)"));
    }
}
