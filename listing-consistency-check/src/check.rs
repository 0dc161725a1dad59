//! The product-level workflow: translate, compare, classify.

use std::collections::BTreeMap;

use listing_consistency::{round4, Confidence, CrossRegionSpecEntry};
use serde::Serialize;

use crate::comparison::{compare_all_pairs, PairwiseComparison, RegionText};
use crate::config::CheckConfig;
use crate::issue::{Issue, IssueCounts};
use crate::risk::{determine_risk, escalate, RiskLevel};
use crate::title::{check_title_mismatch, TitleAnalysis};
use crate::translate::{translate_text, LanguageInfo, Translator};

/// One marketplace's listing of the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionListing {
    pub region: String,
    pub title: String,
    pub description: String,
}

impl RegionListing {
    pub fn new(
        region: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        RegionListing {
            region: region.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Combined-score summary over all pairs; 1.0 each when there are none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl SimilarityStats {
    pub fn from_comparisons(comparisons: &[PairwiseComparison]) -> Self {
        if comparisons.is_empty() {
            return SimilarityStats {
                average: 1.0,
                min: 1.0,
                max: 1.0,
            };
        }
        let scores: Vec<f64> = comparisons.iter().map(PairwiseComparison::combined).collect();
        SimilarityStats {
            average: round4(scores.iter().sum::<f64>() / scores.len() as f64),
            min: round4(scores.iter().copied().fold(f64::INFINITY, f64::min)),
            max: round4(scores.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        }
    }
}

/// HIGH only when every pair is HIGH (vacuously so with no pairs), LOW when
/// any pair is LOW, MEDIUM otherwise.
pub fn overall_confidence(comparisons: &[PairwiseComparison]) -> Confidence {
    let confidences = comparisons.iter().map(PairwiseComparison::confidence);
    if confidences.clone().all(|c| c == Confidence::High) {
        Confidence::High
    } else if confidences.clone().any(|c| c == Confidence::Low) {
        Confidence::Low
    } else {
        Confidence::Medium
    }
}

/// Result of checking one product across its regional listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductReport {
    pub product_id: String,
    pub risk_level: RiskLevel,
    pub statistics: SimilarityStats,
    pub confidence: Confidence,
    pub comparisons: Vec<PairwiseComparison>,
    pub regions_analyzed: Vec<String>,
    /// Descriptions as listed.
    pub descriptions: Vec<RegionText>,
    /// Descriptions as compared, in the target language where translation succeeded.
    pub translated_descriptions: Vec<RegionText>,
    /// Per region, how its description was brought into the target language.
    pub language_info: BTreeMap<String, LanguageInfo>,
    /// Title comparison over translated titles.
    pub title_analysis: TitleAnalysis,
    /// Per region, how its title was brought into the target language.
    pub title_language_info: BTreeMap<String, LanguageInfo>,
    pub issues: Vec<Issue>,
    pub spec_analysis: BTreeMap<String, CrossRegionSpecEntry>,
    pub issue_counts: IssueCounts,
}

impl ProductReport {
    pub fn pair(&self, region_1: &str, region_2: &str) -> Option<&PairwiseComparison> {
        self.comparisons
            .iter()
            .find(|comparison| comparison.involves(region_1, region_2))
    }
}

/// Runs the consistency check for a product.
///
/// ```
/// use listing_consistency_check::{PassthroughTranslator, ProductCheck, RegionListing, RiskLevel};
///
/// let listings = vec![
///     RegionListing::new("US", "Travel Mug", "Insulated travel mug. Keeps drinks hot for 12 hours."),
///     RegionListing::new("UK", "Travel Mug", "Insulated travel mug. Keeps drinks hot for 12 hours."),
/// ];
/// let report = ProductCheck::new(&PassthroughTranslator).run("B0MUG", &listings);
/// assert_eq!(report.risk_level, RiskLevel::Low);
/// assert!(report.issues.is_empty());
/// ```
pub struct ProductCheck<'t, T: ?Sized> {
    translator: &'t T,
    config: CheckConfig,
}

impl<'t, T: Translator + ?Sized> ProductCheck<'t, T> {
    pub fn new(translator: &'t T) -> Self {
        ProductCheck {
            translator,
            config: CheckConfig::standard(),
        }
    }

    pub fn with_config(mut self, config: CheckConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Check `listings`, given in display order. When a region appears more
    /// than once, its last listing is used at the position of its first.
    pub fn run(&self, product_id: &str, listings: &[RegionListing]) -> ProductReport {
        let span = tracing::debug_span!("product_check", product = product_id);
        let _enter = span.enter();

        let listings = dedup_regions(listings);
        let target = self.config.target_language.as_str();

        let mut language_info = BTreeMap::new();
        let mut title_language_info = BTreeMap::new();
        let mut translated_descriptions = Vec::with_capacity(listings.len());
        let mut translated_titles = Vec::with_capacity(listings.len());

        for listing in &listings {
            let region = listing.region.as_str();
            let description = translate_text(self.translator, region, &listing.description, target);
            let title = translate_text(self.translator, region, &listing.title, target);

            translated_descriptions.push(RegionText::new(region, description.translated_text.clone()));
            translated_titles.push(RegionText::new(region, title.translated_text.clone()));
            language_info.insert(listing.region.clone(), description);
            title_language_info.insert(listing.region.clone(), title);
        }

        let title_analysis =
            check_title_mismatch(&translated_titles, self.config.title_mismatch_threshold);
        let analysis = compare_all_pairs(&translated_descriptions, &self.config.issue_caps);

        let computed = determine_risk(&analysis.comparisons);
        let issue_counts = IssueCounts::from_issues(&analysis.issues);
        let risk_level = escalate(computed, issue_counts.high > 0, title_analysis.is_mismatch);
        if risk_level != computed {
            tracing::debug!(
                from = %computed,
                to = %risk_level,
                high_issues = issue_counts.high,
                title_mismatch = title_analysis.is_mismatch,
                "escalated risk"
            );
        }

        tracing::debug!(
            risk = %risk_level,
            pairs = analysis.comparisons.len(),
            issues = issue_counts.total,
            "product checked"
        );

        ProductReport {
            product_id: product_id.to_string(),
            risk_level,
            statistics: SimilarityStats::from_comparisons(&analysis.comparisons),
            confidence: overall_confidence(&analysis.comparisons),
            regions_analyzed: listings.iter().map(|listing| listing.region.clone()).collect(),
            descriptions: listings
                .iter()
                .map(|listing| RegionText::new(listing.region.clone(), listing.description.clone()))
                .collect(),
            translated_descriptions,
            language_info,
            title_analysis,
            title_language_info,
            issues: analysis.issues,
            spec_analysis: analysis.spec_analysis,
            issue_counts,
            comparisons: analysis.comparisons,
        }
    }
}

fn dedup_regions(listings: &[RegionListing]) -> Vec<&RegionListing> {
    let mut out: Vec<&RegionListing> = Vec::with_capacity(listings.len());
    for listing in listings {
        match out.iter_mut().find(|kept| kept.region == listing.region) {
            Some(kept) => *kept = listing,
            None => out.push(listing),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_listing_replaces_earlier_in_place() {
        let listings = vec![
            RegionListing::new("US", "a", "first"),
            RegionListing::new("UK", "b", "uk"),
            RegionListing::new("US", "c", "second"),
        ];
        let kept: Vec<(&str, &str)> = dedup_regions(&listings)
            .into_iter()
            .map(|l| (l.region.as_str(), l.description.as_str()))
            .collect();
        assert_eq!(kept, vec![("US", "second"), ("UK", "uk")]);
    }

    #[test]
    fn stats_without_pairs() {
        let stats = SimilarityStats::from_comparisons(&[]);
        assert_eq!((stats.average, stats.min, stats.max), (1.0, 1.0, 1.0));
        assert_eq!(overall_confidence(&[]), Confidence::High);
    }
}
