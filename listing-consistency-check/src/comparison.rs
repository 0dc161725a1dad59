//! Pairwise comparison of every region pair in a product check.

use std::collections::BTreeMap;

use listing_consistency::{
    compare_across_regions, extract_specs, round4, similarity, Confidence, CrossRegionSpecEntry,
    SimilarityReport,
};
use serde::Serialize;

use crate::config::IssueCaps;
use crate::diff::{description_diff, DiffSegment};
use crate::issue::{aggregate_issues, detect, Issue};

/// A piece of listing text tagged with its marketplace region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionText {
    pub region: String,
    pub text: String,
}

impl RegionText {
    pub fn new(region: impl Into<String>, text: impl Into<String>) -> Self {
        RegionText {
            region: region.into(),
            text: text.into(),
        }
    }
}

/// Everything computed for one unordered region pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseComparison {
    pub region_1: String,
    pub region_2: String,
    pub description_1: String,
    pub description_2: String,
    pub similarity: SimilarityReport,
    pub description_diff: Vec<DiffSegment>,
    /// Issues for this pair alone, before product-level de-duplication.
    pub issues: Vec<Issue>,
}

impl PairwiseComparison {
    pub fn combined(&self) -> f64 {
        self.similarity.combined()
    }

    pub fn confidence(&self) -> Confidence {
        self.similarity.confidence
    }

    pub fn involves(&self, region_1: &str, region_2: &str) -> bool {
        (self.region_1 == region_1 && self.region_2 == region_2)
            || (self.region_1 == region_2 && self.region_2 == region_1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseAnalysis {
    pub comparisons: Vec<PairwiseComparison>,
    /// Spec consistency over all regions at once.
    pub spec_analysis: BTreeMap<String, CrossRegionSpecEntry>,
    /// Pooled, de-duplicated, sorted and capped issues of all pairs.
    pub issues: Vec<Issue>,
}

impl PairwiseAnalysis {
    pub fn pair(&self, region_1: &str, region_2: &str) -> Option<&PairwiseComparison> {
        self.comparisons
            .iter()
            .find(|comparison| comparison.involves(region_1, region_2))
    }
}

/// Compare every unordered pair of `descriptions` in input order (`i < j`).
///
/// Specs are extracted once per region and compared across all regions; each
/// pair's issues are detected against that shared table.
pub fn compare_all_pairs(descriptions: &[RegionText], caps: &IssueCaps) -> PairwiseAnalysis {
    let specs_by_region: Vec<(String, _)> = descriptions
        .iter()
        .map(|entry| (entry.region.clone(), extract_specs(&entry.text)))
        .collect();
    let spec_analysis = compare_across_regions(&specs_by_region);

    let mut comparisons = Vec::new();
    for (i, first) in descriptions.iter().enumerate() {
        for second in &descriptions[i + 1..] {
            let report = similarity(&first.text, &second.text);
            let issues = detect(
                &first.region,
                &second.region,
                &spec_analysis,
                &report.sentence_detail,
                &report.content_gaps,
                report.structural_detail.as_ref(),
            );

            tracing::debug!(
                region_1 = %first.region,
                region_2 = %second.region,
                combined = round4(report.combined()),
                confidence = %report.confidence,
                issues = issues.len(),
                "compared pair"
            );

            comparisons.push(PairwiseComparison {
                region_1: first.region.clone(),
                region_2: second.region.clone(),
                description_1: first.text.clone(),
                description_2: second.text.clone(),
                description_diff: description_diff(&first.text, &second.text),
                similarity: report,
                issues,
            });
        }
    }

    let issues = aggregate_issues(
        comparisons
            .iter()
            .flat_map(|comparison| comparison.issues.iter().cloned()),
        caps,
    );

    PairwiseAnalysis {
        comparisons,
        spec_analysis,
        issues,
    }
}
