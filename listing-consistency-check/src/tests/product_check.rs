use std::collections::HashMap;

use listing_consistency::Confidence;

use crate::{
    CheckConfig, IssueCaps, IssueKind, PassthroughTranslator, ProductCheck, RegionListing,
    RiskLevel, Severity, TranslationError, Translator,
};

const FULL: &str = "Premium wireless headphones with deep bass. Active noise cancellation blocks outside sound. Soft memory foam ear cushions for comfort. Foldable design fits in the travel case. Includes a braided charging cable.";

const TRUNCATED: &str =
    "Premium wireless headphones with deep bass. Active noise cancellation blocks outside sound.";

const POWER_BANK_US: &str = "Power bank with 20000mAh capacity, 65W output, 3 ports, Bluetooth 5.3, 12 hour runtime and 2 colors.";
const POWER_BANK_DE: &str = "Power bank with 10000mAh capacity, 45W output, 2 ports, Bluetooth 5.0, 8 hour runtime and 4 colors.";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn check(listings: &[RegionListing]) -> crate::ProductReport {
    init_tracing();
    ProductCheck::new(&PassthroughTranslator).run("B0TEST", listings)
}

/// Translates from a fixed phrase book; fails on anything else.
struct PhraseBook(HashMap<&'static str, &'static str>);

impl Translator for PhraseBook {
    fn translate(&self, text: &str, _: &str, _: &str) -> Result<String, TranslationError> {
        self.0
            .get(text)
            .map(|translated| translated.to_string())
            .ok_or_else(|| TranslationError::Unavailable {
                message: format!("no entry for {text:?}"),
            })
    }
}

#[test]
fn identical_listings_are_low_risk() {
    let listings: Vec<RegionListing> = ["US", "UK", "CA"]
        .iter()
        .map(|region| RegionListing::new(*region, "Wireless Headphones", FULL))
        .collect();
    let report = check(&listings);

    assert_eq!(report.comparisons.len(), 3);
    assert!(report.comparisons.iter().all(|c| c.combined() == 1.0));
    assert!(report.issues.is_empty());
    assert_eq!(report.risk_level, RiskLevel::Low);
    assert_eq!(report.confidence, Confidence::High);
    assert_eq!(report.statistics.average, 1.0);
    assert!(!report.title_analysis.is_mismatch);
    assert_eq!(report.regions_analyzed, vec!["US", "UK", "CA"]);
}

#[test]
fn battery_conflict_is_one_high_issue() {
    let report = check(&[
        RegionListing::new("US", "Earbuds", "30-hour battery, IPX4 waterproof"),
        RegionListing::new("UK", "Earbuds", "20-hour battery, IPX4 waterproof"),
    ]);

    assert_eq!(report.issues.len(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.kind, IssueKind::SpecConflict);
    assert_eq!(issue.severity, Severity::High);
    assert_eq!(issue.title, "Battery Life Hours Differs");
    assert_eq!(issue.description, "US: 30, UK: 20");

    assert!(!report.spec_analysis["battery_life_hours"].consistent);
    assert!(report.spec_analysis["ip_rating"].consistent);
    assert!(report.comparisons[0].similarity.scores.spec_match < 1.0);
    // scores alone say LOW; the conflict lifts it
    assert_eq!(report.risk_level, RiskLevel::Medium);
}

#[test]
fn title_mismatch_with_conflict_escalates_again() {
    let report = check(&[
        RegionListing::new(
            "US",
            "Anker PowerCore 20000mAh Portable Charger",
            "30-hour battery, IPX4 waterproof",
        ),
        RegionListing::new(
            "UK",
            "Anker Power Bank 10000mAh, USB-C",
            "20-hour battery, IPX4 waterproof",
        ),
    ]);

    assert!(report.title_analysis.is_mismatch);
    assert_eq!(report.title_analysis.mismatches[0].similarity, 0.4061);
    assert_eq!(report.risk_level, RiskLevel::High);
}

#[test]
fn title_mismatch_alone_does_not_escalate() {
    let report = check(&[
        RegionListing::new("US", "Anker PowerCore 20000mAh Portable Charger", FULL),
        RegionListing::new("UK", "Anker Power Bank 10000mAh, USB-C", FULL),
    ]);
    assert!(report.title_analysis.is_mismatch);
    assert_eq!(report.risk_level, RiskLevel::Low);
}

#[test]
fn truncated_description() {
    let report = check(&[
        RegionListing::new("US", "Headphones", FULL),
        RegionListing::new("AU", "Headphones", TRUNCATED),
    ]);

    let pair = report.pair("AU", "US").unwrap();
    assert_eq!(pair.similarity.scores.sentence_alignment, 0.4);

    let rendered: Vec<String> = report.issues.iter().map(|issue| issue.to_string()).collect();
    insta::assert_snapshot!(rendered.join("\n"), @r###"
    [medium] Content only in US: Soft memory foam ear cushions for comfort. (US)
    [medium] Content only in US: Foldable design fits in the travel case. (US)
    [medium] Content only in US: Includes a braided charging cable. (US)
    [medium] Significant Length Difference: AU description is 57% shorter (AU)
    [low] Claim only in US: includes a braided charging cable (US)
    [low] Claim only in US: foldable (US)
    "###);

    assert_eq!(report.issue_counts.medium, 4);
    assert_eq!(report.issue_counts.low, 2);
    assert_eq!(report.issue_counts.total, 6);
    assert_eq!(report.risk_level, RiskLevel::Low);
}

#[test]
fn many_conflicts_override_good_scores() {
    let report = check(&[
        RegionListing::new("US", "Power Bank", POWER_BANK_US),
        RegionListing::new("DE", "Power Bank", POWER_BANK_DE),
    ]);

    assert_eq!(report.issue_counts.high, 6);
    assert!(report.statistics.average > 0.55);
    assert_eq!(report.risk_level, RiskLevel::High);

    let titles: Vec<&str> = report.issues.iter().map(|issue| issue.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Battery Capacity Mah Differs",
            "Battery Life Hours Differs",
            "Bluetooth Version Differs",
            "Color Options Differs",
            "Ports Count Differs",
            "Power Watts Differs",
        ]
    );
}

#[test]
fn caps_come_from_config() {
    let config = CheckConfig {
        issue_caps: IssueCaps {
            high: 2,
            ..IssueCaps::default()
        },
        ..CheckConfig::default()
    };
    let listings = [
        RegionListing::new("US", "Power Bank", POWER_BANK_US),
        RegionListing::new("DE", "Power Bank", POWER_BANK_DE),
    ];
    let report = ProductCheck::new(&PassthroughTranslator)
        .with_config(config)
        .run("B0TEST", &listings);

    assert_eq!(report.issues.len(), 2);
    // the pair still carries all six, and risk counts them
    assert_eq!(report.comparisons[0].issues.len(), 6);
    assert_eq!(report.risk_level, RiskLevel::High);
}

#[test]
fn duplicate_conflicts_collapse_across_pairs() {
    let report = check(&[
        RegionListing::new("US", "Earbuds", "30-hour battery, IPX4 waterproof"),
        RegionListing::new("UK", "Earbuds", "20-hour battery, IPX4 waterproof"),
        RegionListing::new("CA", "Earbuds", "30-hour battery, IPX4 waterproof"),
    ]);

    // US/UK and UK/CA conflict with different descriptions, US/CA agree
    let conflicts: Vec<&str> = report
        .issues
        .iter()
        .filter(|issue| issue.kind == IssueKind::SpecConflict)
        .map(|issue| issue.description.as_str())
        .collect();
    assert_eq!(conflicts, vec!["US: 30, UK: 20", "UK: 20, CA: 30"]);
    assert!(report.pair("US", "CA").unwrap().issues.is_empty());
}

#[test]
fn single_region_has_no_pairs() {
    let report = check(&[RegionListing::new("US", "Earbuds", FULL)]);
    assert!(report.comparisons.is_empty());
    assert_eq!(report.risk_level, RiskLevel::Low);
    assert_eq!(report.confidence, Confidence::High);
    assert_eq!(report.statistics.min, 1.0);
}

#[test]
fn translation_feeds_comparison() {
    const GERMAN: &str = "Kabellose Kopfhörer mit Geräuschunterdrückung und 30 Stunden Akku.";
    const ENGLISH: &str = "Wireless headphones with noise cancellation and 30 hour battery.";

    let book = PhraseBook(
        [(GERMAN, ENGLISH), ("Kopfhörer", "Headphones")]
            .iter()
            .copied()
            .collect(),
    );
    let listings = [
        RegionListing::new("US", "Headphones", ENGLISH),
        RegionListing::new("DE", "Kopfhörer", GERMAN),
    ];
    init_tracing();
    let report = ProductCheck::new(&book).run("B0TEST", &listings);

    let de = &report.language_info["DE"];
    assert_eq!(de.detected_language, "de");
    assert_eq!(de.language_name, "German");
    assert!(de.was_translated);
    assert_eq!(de.original_text, GERMAN);
    assert_eq!(report.translated_descriptions[1].text, ENGLISH);
    assert!(!report.language_info["US"].was_translated);

    // "Kopfhörer" is too short to detect, so the region decides
    assert!(report.title_language_info["DE"].was_translated);
    assert_eq!(report.comparisons[0].combined(), 1.0);
    assert!(report.issues.is_empty());
}

#[test]
fn failed_translation_compares_original() {
    const FRENCH: &str = "Casque sans fil avec réduction de bruit et autonomie de 30 heures.";

    let book = PhraseBook(HashMap::new());
    let listings = [
        RegionListing::new("US", "Headphones", "Wireless headphones with 30 hour battery."),
        RegionListing::new("FR", "Casque", FRENCH),
    ];
    init_tracing();
    let report = ProductCheck::new(&book).run("B0TEST", &listings);

    let fr = &report.language_info["FR"];
    assert_eq!(fr.detected_language, "fr");
    assert!(!fr.was_translated);
    assert_eq!(fr.translated_text, FRENCH);
    assert_eq!(report.translated_descriptions[1].text, FRENCH);
    assert_eq!(report.comparisons[0].description_2, FRENCH);
}

#[test]
fn report_serializes_for_presentation() {
    let report = check(&[
        RegionListing::new("US", "Earbuds", "30-hour battery, IPX4 waterproof"),
        RegionListing::new("UK", "Earbuds", "20-hour battery, IPX4 waterproof"),
    ]);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["risk_level"], "MEDIUM");
    assert_eq!(json["issues"][0]["kind"], "spec_conflict");
    assert_eq!(json["issues"][0]["severity"], "high");
    assert_eq!(json["issue_counts"]["total"], 1);
    assert_eq!(json["comparisons"][0]["description_diff"][0]["type"], "delete");
    assert_eq!(json["comparisons"][0]["description_diff"][0]["text"], "3");
    assert_eq!(json["spec_analysis"]["battery_life_hours"]["values"]["UK"], "20");
    assert_eq!(json["language_info"]["US"]["detected_language"], "en");
}
