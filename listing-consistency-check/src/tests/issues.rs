use listing_consistency::{
    compare_across_regions, extract_specs, ContentGaps, SentenceAlignment, StructuralMetrics,
};

use crate::{aggregate_issues, detect, Issue, IssueCaps, IssueCounts, IssueKind, Severity};

fn spec_table(
    regions: &[(&str, &str)],
) -> std::collections::BTreeMap<String, listing_consistency::CrossRegionSpecEntry> {
    let specs: Vec<(String, _)> = regions
        .iter()
        .map(|(region, text)| (region.to_string(), extract_specs(text)))
        .collect();
    compare_across_regions(&specs)
}

fn render(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn issue(kind: IssueKind, severity: Severity, title: &str, description: &str) -> Issue {
    Issue {
        kind,
        severity,
        title: title.to_string(),
        description: description.to_string(),
        regions: vec!["US".to_string()],
    }
}

#[test]
fn conflict_and_missing_specs() {
    let table = spec_table(&[
        ("US", "30 hour battery, IPX4, 250g"),
        ("UK", "20 hour battery, IPX4"),
    ]);
    let issues = detect(
        "US",
        "UK",
        &table,
        &SentenceAlignment::default(),
        &ContentGaps::default(),
        None,
    );

    insta::assert_snapshot!(render(&issues), @r###"
    [high] Battery Life Hours Differs: US: 30, UK: 20 (US, UK)
    [low] Weight Grams Missing: Weight Grams (250) is in US but not in UK (UK)
    "###);
}

#[test]
fn other_regions_do_not_leak_into_pair() {
    let table = spec_table(&[
        ("US", "30 hour battery"),
        ("UK", "30 hour battery"),
        ("DE", "20 hour battery"),
    ]);
    let issues = detect(
        "US",
        "UK",
        &table,
        &SentenceAlignment::default(),
        &ContentGaps::default(),
        None,
    );
    assert!(issues.is_empty());

    let issues = detect(
        "UK",
        "DE",
        &table,
        &SentenceAlignment::default(),
        &ContentGaps::default(),
        None,
    );
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].description, "UK: 30, DE: 20");
}

#[test]
fn orphans_are_capped_and_truncated() {
    let long = "x".repeat(130);
    let alignment = SentenceAlignment {
        only_in_1: vec![
            long.clone(),
            "Second.".to_string(),
            "Third.".to_string(),
            "Fourth is dropped.".to_string(),
        ],
        only_in_2: vec!["Only on the right.".to_string()],
        ..SentenceAlignment::default()
    };
    let issues = detect(
        "US",
        "JP",
        &Default::default(),
        &alignment,
        &ContentGaps::default(),
        None,
    );

    assert_eq!(issues.len(), 4);
    assert!(issues.iter().all(|issue| issue.kind == IssueKind::MissingContent));
    assert_eq!(issues[0].description, format!("{}…", "x".repeat(120)));
    assert_eq!(issues[1].title, "Content only in US");
    assert_eq!(issues[3].title, "Content only in JP");
    assert_eq!(issues[3].regions, vec!["JP"]);
}

#[test]
fn claims_are_capped_and_cut() {
    let gaps = ContentGaps {
        only_in_1: vec!["a".repeat(105), "foldable".into(), "portable".into()],
        only_in_2: vec![],
    };
    let issues = detect(
        "US",
        "FR",
        &Default::default(),
        &SentenceAlignment::default(),
        &gaps,
        None,
    );

    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].description, "a".repeat(100));
    assert_eq!(issues[1].description, "foldable");
    assert_eq!(issues[1].severity, Severity::Low);
}

#[test]
fn length_disparity_names_shorter_region() {
    let metrics = StructuralMetrics {
        length_ratio: 0.4333,
        char_count_1: 210,
        char_count_2: 91,
        ..StructuralMetrics::default()
    };
    let issues = detect(
        "US",
        "AU",
        &Default::default(),
        &SentenceAlignment::default(),
        &ContentGaps::default(),
        Some(&metrics),
    );
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::LengthDisparity);
    assert_eq!(issues[0].description, "AU description is 57% shorter");
    assert_eq!(issues[0].regions, vec!["AU"]);

    let even = StructuralMetrics {
        length_ratio: 0.5,
        ..metrics
    };
    let issues = detect(
        "US",
        "AU",
        &Default::default(),
        &SentenceAlignment::default(),
        &ContentGaps::default(),
        Some(&even),
    );
    assert!(issues.is_empty());
}

#[test]
fn severity_sort_keeps_detection_order() {
    let table = spec_table(&[("US", "250g, 65W"), ("UK", "")]);
    let gaps = ContentGaps {
        only_in_1: vec!["foldable".into()],
        only_in_2: vec![],
    };
    let alignment = SentenceAlignment {
        only_in_2: vec!["Extra line.".to_string()],
        ..SentenceAlignment::default()
    };
    let issues = detect("US", "UK", &table, &alignment, &gaps, None);

    let kinds: Vec<(Severity, IssueKind)> =
        issues.iter().map(|issue| (issue.severity, issue.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (Severity::Medium, IssueKind::MissingContent),
            (Severity::Low, IssueKind::MissingSpec),
            (Severity::Low, IssueKind::MissingSpec),
            (Severity::Low, IssueKind::ContentGap),
        ]
    );
    // spec names iterate sorted
    assert_eq!(issues[1].title, "Power Watts Missing");
    assert_eq!(issues[2].title, "Weight Grams Missing");
}

#[test]
fn aggregation_dedupes_then_caps() {
    let conflict = issue(IssueKind::SpecConflict, Severity::High, "Power Watts Differs", "US: 65, DE: 45");
    let mut pool = vec![
        issue(IssueKind::ContentGap, Severity::Low, "Claim only in US", "foldable"),
        conflict.clone(),
        conflict.clone(),
    ];
    for n in 0..5 {
        pool.push(issue(
            IssueKind::MissingContent,
            Severity::Medium,
            "Content only in US",
            &format!("Sentence {n}."),
        ));
    }

    let caps = IssueCaps {
        high: 20,
        medium: 3,
        low: 10,
    };
    let issues = aggregate_issues(pool, &caps);

    assert_eq!(
        IssueCounts::from_issues(&issues),
        IssueCounts {
            high: 1,
            medium: 3,
            low: 1,
            total: 5
        }
    );
    assert_eq!(issues[0], conflict);
    assert_eq!(issues[1].description, "Sentence 0.");
    assert_eq!(issues[3].description, "Sentence 2.");
    assert_eq!(issues[4].kind, IssueKind::ContentGap);
}

#[test]
fn aggregation_keys_on_kind_title_and_description() {
    let pool = vec![
        issue(IssueKind::ContentGap, Severity::Low, "Claim only in US", "foldable"),
        issue(IssueKind::MissingContent, Severity::Medium, "Claim only in US", "foldable"),
        issue(IssueKind::ContentGap, Severity::Low, "Claim only in UK", "foldable"),
    ];
    assert_eq!(aggregate_issues(pool, &IssueCaps::default()).len(), 3);
}
