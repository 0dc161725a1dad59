//! Runs fixtures through the product check and evaluates their checks.

use listing_consistency_check::{PassthroughTranslator, ProductCheck, ProductReport};

use crate::config::HarnessConfig;
use crate::errors::SpecResult;
use crate::failures::{ExpectedFailures, FailureState, HarnessResult};
use crate::fixture::ScenarioFixture;
use crate::formatter::{format_failure, format_summary};
use crate::loader::load_all_fixtures;
use crate::matcher::{check_field, MatchResult};

/// Run a fixture's listings through [`ProductCheck`] with the fixture's
/// config. Texts are compared as written; fixtures are expected to be in the
/// target language already.
pub fn run_fixture(fixture: &ScenarioFixture) -> ProductReport {
    let product_id = fixture.title.as_deref().unwrap_or("fixture");
    ProductCheck::new(&PassthroughTranslator)
        .with_config(fixture.config.clone())
        .run(product_id, &fixture.listings)
}

/// Evaluate every check of `fixture` against `report`.
pub fn check_fixture(fixture: &ScenarioFixture, report: &ProductReport) -> MatchResult {
    let mut result = MatchResult::new();
    for check in &fixture.checks {
        result.record(check.clone(), check_field(report, check));
    }
    result
}

/// Load every fixture under the configured directory, run it, and sort
/// failures into expected ones and regressions.
pub fn run_harness(config: &HarnessConfig) -> SpecResult<HarnessResult> {
    let fixtures = load_all_fixtures(&config.fixtures_dir)?;
    let expected = ExpectedFailures::load(&config.failures_file)?;
    let mut harness = HarnessResult::new();
    harness.ledger_entries = expected.count();
    harness.stale_fixtures = expected
        .all_fixtures()
        .into_iter()
        .filter(|listed| !fixtures.iter().any(|(name, _)| name == listed))
        .map(str::to_string)
        .collect();

    for (name, fixture) in &fixtures {
        let report = run_fixture(fixture);
        let matched = check_fixture(fixture, &report);

        let mut regressions = 0;
        let mut expected_failures = 0;
        for _ in &matched.passed {
            harness.record_pass();
        }
        for failed in &matched.failed {
            let check_ref = ExpectedFailures::format_ref(failed.check.index);
            let state = expected.is_expected(name, &check_ref);
            harness.record_failure(state);
            if state == FailureState::Regression {
                regressions += 1;
                harness.reports.push(format_failure(name, failed, &report));
            } else {
                expected_failures += 1;
                let reason = expected
                    .get_entry(name, &check_ref)
                    .and_then(|entry| entry.reason.as_deref())
                    .unwrap_or("no reason given");
                harness.reports.push(format!(
                    "  expected failure {}:{} ({})",
                    name, check_ref, reason
                ));
            }
        }

        if !matched.failed.is_empty() {
            harness.reports.push(format_summary(
                name,
                matched.passed.len(),
                matched.failed.len(),
                expected_failures,
                regressions,
            ));
        }
    }

    Ok(harness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_fixture;
    use listing_consistency_check::RiskLevel;
    use std::io::Write;

    const CONFLICT: &str = r#"
title = "Conflict"
checks = ["risk = MEDIUM", "issues.total = 2"]

[[listing]]
region = "US"
title = "Earbuds"
description = "30-hour battery, IPX4 waterproof"

[[listing]]
region = "UK"
title = "Earbuds"
description = "20-hour battery, IPX4 waterproof"
"#;

    #[test]
    fn test_run_fixture_uses_title_as_product_id() {
        let fixture = parse_fixture(CONFLICT).unwrap();
        let report = run_fixture(&fixture);
        assert_eq!(report.product_id, "Conflict");
        assert_eq!(report.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_check_fixture_splits_results() {
        let fixture = parse_fixture(CONFLICT).unwrap();
        let report = run_fixture(&fixture);
        let matched = check_fixture(&fixture, &report);

        assert_eq!(matched.total(), 2);
        assert_eq!(matched.passed.len(), 1);
        assert_eq!(matched.failed[0].check.index, 2);
    }

    #[test]
    fn test_harness_separates_expected_failures() {
        let fixtures = tempfile::tempdir().unwrap();
        let ledger_dir = tempfile::tempdir().unwrap();
        std::fs::write(fixtures.path().join("conflict.toml"), CONFLICT).unwrap();

        let config = HarnessConfig::standard()
            .with_fixtures_dir(fixtures.path())
            .with_failures_file(ledger_dir.path().join("expected-failures.toml"));

        let result = run_harness(&config).unwrap();
        assert_eq!(result.total, 2);
        assert_eq!(result.regressions, 1);
        assert!(result.reports[0].contains("FAIL: conflict.toml:C2"));

        let mut ledger = std::fs::File::create(&config.failures_file).unwrap();
        writeln!(
            ledger,
            "[[pending]]\nfixture = \"conflict.toml\"\ncheck = \"C2\"\nreason = \"one issue only\""
        )
        .unwrap();

        let result = run_harness(&config).unwrap();
        assert!(result.success());
        assert_eq!(result.expected_failures, 1);
        assert_eq!(result.passed, 1);
        assert_eq!(result.ledger_entries, 1);
        assert!(result.stale_fixtures.is_empty());
        assert!(result
            .reports
            .iter()
            .any(|report| report.contains("expected failure conflict.toml:C2 (one issue only)")));
    }

    #[test]
    fn test_harness_reports_stale_ledger_fixtures() {
        let fixtures = tempfile::tempdir().unwrap();
        let ledger_dir = tempfile::tempdir().unwrap();
        std::fs::write(fixtures.path().join("conflict.toml"), CONFLICT).unwrap();
        let ledger = ledger_dir.path().join("expected-failures.toml");
        std::fs::write(
            &ledger,
            "[[known]]\nfixture = \"renamed.toml\"\ncheck = \"C1\"\n",
        )
        .unwrap();

        let config = HarnessConfig::standard()
            .with_fixtures_dir(fixtures.path())
            .with_failures_file(ledger);

        let result = run_harness(&config).unwrap();
        assert_eq!(result.ledger_entries, 1);
        assert_eq!(result.stale_fixtures, vec!["renamed.toml"]);
        assert_eq!(result.regressions, 1);
    }
}
