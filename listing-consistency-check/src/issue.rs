//! Severity-ranked issues for one region pair, and their aggregation across
//! all pairs of a product.

use std::collections::{BTreeMap, HashSet};

use listing_consistency::{ContentGaps, CrossRegionSpecEntry, SentenceAlignment, StructuralMetrics};
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::IssueCaps;

/// Orphan sentences reported per side of a pair.
pub const MAX_ORPHAN_ISSUES: usize = 3;
/// Uncovered claims reported per side of a pair.
pub const MAX_CLAIM_ISSUES: usize = 2;
/// Orphan sentence descriptions are cut to this many characters.
pub const ORPHAN_DESCRIPTION_LIMIT: usize = 120;
/// Claim descriptions are cut to this many characters.
pub const CLAIM_DESCRIPTION_LIMIT: usize = 100;
/// Length ratios below this produce a length disparity issue.
pub const LENGTH_DISPARITY_RATIO: f64 = 0.50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    SpecConflict,
    MissingSpec,
    MissingContent,
    ContentGap,
    LengthDisparity,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::SpecConflict => "spec_conflict",
            IssueKind::MissingSpec => "missing_spec",
            IssueKind::MissingContent => "missing_content",
            IssueKind::ContentGap => "content_gap",
            IssueKind::LengthDisparity => "length_disparity",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "spec_conflict" => IssueKind::SpecConflict,
            "missing_spec" => IssueKind::MissingSpec,
            "missing_content" => IssueKind::MissingContent,
            "content_gap" => IssueKind::ContentGap,
            "length_disparity" => IssueKind::LengthDisparity,
            _ => return None,
        })
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered most severe first, so sorting ascending puts `High` at the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// Regions the issue concerns.
    pub regions: Vec<String>,
}

impl Issue {
    fn new(
        kind: IssueKind,
        severity: Severity,
        title: String,
        description: String,
        regions: Vec<String>,
    ) -> Self {
        Issue {
            kind,
            severity,
            title,
            description,
            regions,
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.severity,
            self.title,
            self.description,
            self.regions.join(", ")
        )
    }
}

/// `battery_life_hours` → `Battery Life Hours`.
pub fn readable_spec_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// First `limit` grapheme clusters of `text`, and whether anything was cut.
fn truncate_graphemes(text: &str, limit: usize) -> (&str, bool) {
    match text.grapheme_indices(true).nth(limit) {
        Some((offset, _)) => (&text[..offset], true),
        None => (text, false),
    }
}

/// Values of `entry` recorded for the regions of `pair`, in pair order.
fn values_in_pair<'a>(entry: &'a CrossRegionSpecEntry, pair: [&'a str; 2]) -> Vec<(&'a str, &'a str)> {
    pair.iter()
        .filter_map(|region| entry.value_for(region).map(|value| (*region, value)))
        .collect()
}

/// Issues for the pair `(region_1, region_2)`.
///
/// `spec_analysis` is the cross-region table over all regions of the product;
/// only the two regions of the pair are looked at. The result is stably
/// sorted by severity, so ties keep detection order.
pub fn detect(
    region_1: &str,
    region_2: &str,
    spec_analysis: &BTreeMap<String, CrossRegionSpecEntry>,
    sentence_alignment: &SentenceAlignment,
    content_gaps: &ContentGaps,
    structural: Option<&StructuralMetrics>,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let pair = [region_1, region_2];

    for (name, entry) in spec_analysis {
        if let &[(r1, v1), (r2, v2)] = values_in_pair(entry, pair).as_slice() {
            if v1 != v2 {
                issues.push(Issue::new(
                    IssueKind::SpecConflict,
                    Severity::High,
                    format!("{} Differs", readable_spec_name(name)),
                    format!("{}: {}, {}: {}", r1, v1, r2, v2),
                    vec![r1.to_string(), r2.to_string()],
                ));
            }
        }
    }

    for (name, entry) in spec_analysis {
        if let &[(present_region, value)] = values_in_pair(entry, pair).as_slice() {
            let missing_region = if present_region == region_1 { region_2 } else { region_1 };
            let readable = readable_spec_name(name);
            issues.push(Issue::new(
                IssueKind::MissingSpec,
                Severity::Low,
                format!("{} Missing", readable),
                format!(
                    "{} ({}) is in {} but not in {}",
                    readable, value, present_region, missing_region
                ),
                vec![missing_region.to_string()],
            ));
        }
    }

    let orphans = [
        (region_1, &sentence_alignment.only_in_1),
        (region_2, &sentence_alignment.only_in_2),
    ];
    for (region, sentences) in orphans {
        for sentence in sentences.iter().take(MAX_ORPHAN_ISSUES) {
            let (head, cut) = truncate_graphemes(sentence, ORPHAN_DESCRIPTION_LIMIT);
            let description = if cut { format!("{}…", head) } else { head.to_string() };
            issues.push(Issue::new(
                IssueKind::MissingContent,
                Severity::Medium,
                format!("Content only in {}", region),
                description,
                vec![region.to_string()],
            ));
        }
    }

    let claims = [
        (region_1, &content_gaps.only_in_1),
        (region_2, &content_gaps.only_in_2),
    ];
    for (region, claims) in claims {
        for claim in claims.iter().take(MAX_CLAIM_ISSUES) {
            let (head, _) = truncate_graphemes(claim, CLAIM_DESCRIPTION_LIMIT);
            issues.push(Issue::new(
                IssueKind::ContentGap,
                Severity::Low,
                format!("Claim only in {}", region),
                head.to_string(),
                vec![region.to_string()],
            ));
        }
    }

    if let Some(metrics) = structural {
        if metrics.length_ratio < LENGTH_DISPARITY_RATIO {
            let shorter = if metrics.char_count_1 < metrics.char_count_2 {
                region_1
            } else {
                region_2
            };
            let shortfall = ((1.0 - metrics.length_ratio) * 100.0).round() as i64;
            issues.push(Issue::new(
                IssueKind::LengthDisparity,
                Severity::Medium,
                "Significant Length Difference".to_string(),
                format!("{} description is {}% shorter", shorter, shortfall),
                vec![shorter.to_string()],
            ));
        }
    }

    issues.sort_by_key(|issue| issue.severity);
    issues
}

/// Pool issues from every pair into the product-level list.
///
/// Issues with the same kind, title and description collapse to the first
/// occurrence. The rest are sorted by severity and cut to the per-severity
/// caps; issues past a cap are dropped.
pub fn aggregate_issues<I>(issues: I, caps: &IssueCaps) -> Vec<Issue>
where
    I: IntoIterator<Item = Issue>,
{
    let mut seen = HashSet::new();
    let mut unique: Vec<Issue> = issues
        .into_iter()
        .filter(|issue| {
            seen.insert((
                issue.kind,
                issue.title.clone(),
                issue.description.clone(),
            ))
        })
        .collect();
    unique.sort_by_key(|issue| issue.severity);

    let mut counts = IssueCounts::default();
    unique
        .into_iter()
        .filter(|issue| {
            if counts.get(issue.severity) < caps.cap_for(issue.severity) {
                counts.add(issue.severity);
                true
            } else {
                false
            }
        })
        .collect()
}

/// Issue totals per severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IssueCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
}

impl IssueCounts {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut counts = IssueCounts::default();
        for issue in issues {
            counts.add(issue.severity);
        }
        counts
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
        self.total += 1;
    }
}
