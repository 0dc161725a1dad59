use crate::{
    check_fixture, load_all_fixtures, parse_fixture, run_fixture, run_harness, CompareOp,
    HarnessConfig, ScenarioFixture,
};
use listing_consistency_check::RiskLevel;
use std::fs;
use std::path::Path;

/// Load and parse a fixture file from the fixtures directory.
fn load_fixture(name: &str) -> ScenarioFixture {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name);
    let content =
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", name, e));
    parse_fixture(&content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", name, e))
}

fn assert_fixture_passes(name: &str) -> listing_consistency_check::ProductReport {
    let fixture = load_fixture(name);
    let report = run_fixture(&fixture);
    let matched = check_fixture(&fixture, &report);
    assert!(
        matched.all_passed(),
        "{}: failing checks {:#?}",
        name,
        matched.failed
    );
    report
}

#[test]
fn test_battery_conflict_fixture() {
    let fixture = load_fixture("battery-conflict.toml");

    assert_eq!(
        fixture.title.as_deref(),
        Some("Battery life differs between US and UK")
    );
    assert_eq!(fixture.listings.len(), 2);
    assert_eq!(fixture.checks[0].field, "issues.spec_conflict");
    assert_eq!(fixture.checks[2].operator, CompareOp::Contains);

    let report = assert_fixture_passes("battery-conflict.toml");
    assert_eq!(report.risk_level, RiskLevel::Medium);
}

#[test]
fn test_issue_caps_fixture_config() {
    let fixture = load_fixture("issue-caps.toml");
    assert_eq!(fixture.config.issue_caps.high, 2);
    assert_eq!(fixture.config.issue_caps.medium, 15);
    assert_fixture_passes("issue-caps.toml");
}

#[test]
fn test_truncated_description_fixture() {
    let report = assert_fixture_passes("truncated-description.toml");
    assert_eq!(report.issue_counts.total, 6);
}

#[test]
fn test_title_fixtures() {
    let report = assert_fixture_passes("title-paraphrase.toml");
    assert!(report.title_analysis.mismatches.is_empty());

    let report = assert_fixture_passes("title-mismatch-escalation.toml");
    assert_eq!(report.title_analysis.mismatches[0].region_1, "US");
}

// ============================================================================
// Full harness
// ============================================================================

#[test]
fn test_all_fixtures_parse() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    let fixtures = load_all_fixtures(&dir).unwrap();

    assert_eq!(fixtures.len(), 8);
    for (name, fixture) in &fixtures {
        assert!(fixture.title.is_some(), "{} has no title", name);
        assert!(!fixture.checks.is_empty(), "{} has no checks", name);
    }
}

#[test]
fn test_harness_has_no_regressions() {
    let result = run_harness(&HarnessConfig::standard()).unwrap();

    assert!(result.success(), "{}", result.reports.join("\n"));
    assert_eq!(result.expected_failures, 0);
    assert_eq!(result.ledger_entries, 0);
    assert!(result.stale_fixtures.is_empty());
    assert_eq!(result.total, result.passed);
    assert!(result.total >= 50);
}
