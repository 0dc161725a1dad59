//! Multi-signal similarity between two descriptions.
//!
//! Nine independent signals are computed and combined with fixed weights:
//!
//! | signal | input | weight |
//! |---|---|---|
//! | `ngram_dice` | normalized | 0.20 |
//! | `bigram_jaccard` | normalized | 0.10 |
//! | `word_jaccard` | normalized | 0.10 |
//! | `sequence` | normalized | 0.10 |
//! | `sentence_alignment` | raw | 0.15 |
//! | `feature_overlap` | raw | 0.10 |
//! | `spec_match` | raw | 0.15 |
//! | `structural` | raw | 0.05 |
//! | `tfidf_cosine` | normalized | 0.05 |
//!
//! Confidence reflects how much the six content signals agree.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::features::extract_features;
use crate::gaps::{find_gaps, ContentGaps};
use crate::normalize::normalize;
use crate::overlap::{bigram_jaccard, dice_coefficient, word_jaccard};
use crate::round4;
use crate::sentences::{align_sentences, split_sentences, SentenceAlignment};
use crate::sequence::sequence_ratio;
use crate::specs::{extract_specs, SpecMap};
use crate::structural::{structural_similarity, StructuralMetrics};
use crate::tfidf::tfidf_cosine;

pub const NGRAM_DICE_WEIGHT: f64 = 0.20;
pub const BIGRAM_JACCARD_WEIGHT: f64 = 0.10;
pub const WORD_JACCARD_WEIGHT: f64 = 0.10;
pub const SEQUENCE_WEIGHT: f64 = 0.10;
pub const SENTENCE_ALIGNMENT_WEIGHT: f64 = 0.15;
pub const FEATURE_OVERLAP_WEIGHT: f64 = 0.10;
pub const SPEC_MATCH_WEIGHT: f64 = 0.15;
pub const STRUCTURAL_WEIGHT: f64 = 0.05;
pub const TFIDF_WEIGHT: f64 = 0.05;

/// Agreement among the content signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Classify by the spread (`max - min`) of signal values.
    pub fn from_spread(values: &[f64]) -> Self {
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let spread = if values.is_empty() { 0.0 } else { max - min };
        if spread < 0.15 {
            Confidence::High
        } else if spread < 0.30 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "HIGH",
            Confidence::Medium => "MEDIUM",
            Confidence::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-signal scores and their weighted combination, rounded to 4 digits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SimilarityScores {
    pub ngram_dice: f64,
    pub bigram_jaccard: f64,
    pub word_jaccard: f64,
    pub sequence: f64,
    pub sentence_alignment: f64,
    pub feature_overlap: f64,
    pub spec_match: f64,
    pub structural: f64,
    pub tfidf_cosine: f64,
    pub combined: f64,
}

/// Values of one spec in the two compared texts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecDetail {
    pub value_1: Option<String>,
    pub value_2: Option<String>,
    /// Both present and equal, or both absent.
    pub consistent: bool,
}

/// Full result of comparing two descriptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityReport {
    pub scores: SimilarityScores,
    pub confidence: Confidence,
    pub sentence_detail: SentenceAlignment,
    pub spec_detail: BTreeMap<String, SpecDetail>,
    pub content_gaps: ContentGaps,
    /// Absent when the texts could not be compared.
    pub structural_detail: Option<StructuralMetrics>,
}

impl SimilarityReport {
    /// All-zero result for texts that cannot be compared.
    pub fn empty() -> Self {
        SimilarityReport {
            scores: SimilarityScores::default(),
            confidence: Confidence::Low,
            sentence_detail: SentenceAlignment::default(),
            spec_detail: BTreeMap::new(),
            content_gaps: ContentGaps::default(),
            structural_detail: None,
        }
    }

    pub fn combined(&self) -> f64 {
        self.scores.combined
    }
}

/// Agreement of two spec maps.
///
/// Matching specs count fully, conflicting specs count against at half
/// weight, and specs present on one side only dilute the denominator.
/// Two empty maps agree completely.
pub fn spec_match(specs_1: &SpecMap, specs_2: &SpecMap) -> f64 {
    let all_keys: BTreeSet<&String> = specs_1.keys().chain(specs_2.keys()).collect();
    if all_keys.is_empty() {
        return 1.0;
    }

    let (mut matching, mut conflicting) = (0usize, 0usize);
    for (key, value_1) in specs_1 {
        match specs_2.get(key) {
            Some(value_2) if value_2 == value_1 => matching += 1,
            Some(_) => conflicting += 1,
            None => {}
        }
    }

    let score = (matching as f64 - 0.5 * conflicting as f64) / all_keys.len() as f64;
    score.clamp(0.0, 1.0)
}

fn spec_details(specs_1: &SpecMap, specs_2: &SpecMap) -> BTreeMap<String, SpecDetail> {
    specs_1
        .keys()
        .chain(specs_2.keys())
        .map(|key| {
            let value_1 = specs_1.get(key).cloned();
            let value_2 = specs_2.get(key).cloned();
            let consistent = value_1 == value_2;
            (
                key.clone(),
                SpecDetail {
                    value_1,
                    value_2,
                    consistent,
                },
            )
        })
        .collect()
}

/// Compare two raw descriptions.
///
/// Either text empty, or normalizing to nothing, yields
/// [`SimilarityReport::empty`].
///
/// ```
/// use listing_consistency::{similarity, Confidence};
///
/// let text = "Wireless earbuds with 30-hour battery. IPX4 sweat resistant.";
/// let report = similarity(text, text);
/// assert_eq!(report.scores.combined, 1.0);
/// assert_eq!(report.confidence, Confidence::High);
///
/// assert_eq!(similarity("", text).scores.combined, 0.0);
/// ```
pub fn similarity(text_1: &str, text_2: &str) -> SimilarityReport {
    if text_1.is_empty() || text_2.is_empty() {
        return SimilarityReport::empty();
    }
    let normalized_1 = normalize(text_1);
    let normalized_2 = normalize(text_2);
    if normalized_1.is_empty() || normalized_2.is_empty() {
        return SimilarityReport::empty();
    }

    let ngram_dice = dice_coefficient(&normalized_1, &normalized_2);
    let bigram = bigram_jaccard(&normalized_1, &normalized_2);
    let word = word_jaccard(&normalized_1, &normalized_2);
    let sequence = sequence_ratio(&normalized_1, &normalized_2);

    let sentence_detail = align_sentences(&split_sentences(text_1), &split_sentences(text_2));
    let sentence_score = sentence_detail.alignment_score;

    let features_1 = extract_features(text_1);
    let features_2 = extract_features(text_2);
    let feature_overlap = if features_1.is_empty() && features_2.is_empty() {
        1.0
    } else {
        let shared = features_1.intersection(&features_2).count();
        shared as f64 / features_1.union(&features_2).count() as f64
    };

    let specs_1 = extract_specs(text_1);
    let specs_2 = extract_specs(text_2);
    let spec_score = spec_match(&specs_1, &specs_2);

    let structural = structural_similarity(text_1, text_2);

    // no shared vocabulary at all counts as no similarity
    let tfidf = tfidf_cosine(&normalized_1, &normalized_2).unwrap_or(0.0);

    let content_gaps = find_gaps(text_1, text_2);

    let combined = ngram_dice * NGRAM_DICE_WEIGHT
        + bigram * BIGRAM_JACCARD_WEIGHT
        + word * WORD_JACCARD_WEIGHT
        + sequence * SEQUENCE_WEIGHT
        + sentence_score * SENTENCE_ALIGNMENT_WEIGHT
        + feature_overlap * FEATURE_OVERLAP_WEIGHT
        + spec_score * SPEC_MATCH_WEIGHT
        + structural.score * STRUCTURAL_WEIGHT
        + tfidf * TFIDF_WEIGHT;

    let confidence = Confidence::from_spread(&[
        ngram_dice,
        bigram,
        word,
        sequence,
        sentence_score,
        feature_overlap,
    ]);

    SimilarityReport {
        scores: SimilarityScores {
            ngram_dice: round4(ngram_dice),
            bigram_jaccard: round4(bigram),
            word_jaccard: round4(word),
            sequence: round4(sequence),
            sentence_alignment: round4(sentence_score),
            feature_overlap: round4(feature_overlap),
            spec_match: round4(spec_score),
            structural: round4(structural.score),
            tfidf_cosine: round4(tfidf),
            combined: round4(combined.clamp(0.0, 1.0)),
        },
        confidence,
        sentence_detail,
        spec_detail: spec_details(&specs_1, &specs_2),
        content_gaps,
        structural_detail: Some(structural),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(pairs: &[(&str, &str)]) -> SpecMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn weights_sum_to_one() {
        let total = NGRAM_DICE_WEIGHT
            + BIGRAM_JACCARD_WEIGHT
            + WORD_JACCARD_WEIGHT
            + SEQUENCE_WEIGHT
            + SENTENCE_ALIGNMENT_WEIGHT
            + FEATURE_OVERLAP_WEIGHT
            + SPEC_MATCH_WEIGHT
            + STRUCTURAL_WEIGHT
            + TFIDF_WEIGHT;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn spec_match_empty_is_full_agreement() {
        assert_eq!(spec_match(&SpecMap::new(), &SpecMap::new()), 1.0);
    }

    #[test]
    fn spec_match_drops_with_conflicts() {
        let base = specs(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]);
        let one_conflict = specs(&[("a", "1"), ("b", "2"), ("c", "9"), ("d", "4")]);
        let two_conflicts = specs(&[("a", "1"), ("b", "2"), ("c", "9"), ("d", "9")]);

        assert_eq!(spec_match(&base, &base), 1.0);
        // (3 - 0.5) / 4
        assert_eq!(spec_match(&base, &one_conflict), 0.625);
        // (2 - 1) / 4
        assert_eq!(spec_match(&base, &two_conflicts), 0.25);
    }

    #[test]
    fn spec_match_one_sided_dilutes() {
        let left = specs(&[("a", "1")]);
        let right = specs(&[("a", "1"), ("b", "2")]);
        assert_eq!(spec_match(&left, &right), 0.5);
    }

    #[test]
    fn spec_match_clamps_at_zero() {
        let left = specs(&[("a", "1")]);
        let right = specs(&[("a", "2")]);
        assert_eq!(spec_match(&left, &right), 0.0);
    }

    #[test]
    fn confidence_bands() {
        assert_eq!(Confidence::from_spread(&[0.5, 0.6]), Confidence::High);
        assert_eq!(Confidence::from_spread(&[0.5, 0.7]), Confidence::Medium);
        assert_eq!(Confidence::from_spread(&[0.1, 0.9]), Confidence::Low);
    }

    #[test]
    fn guard_on_empty_normalization() {
        let report = similarity("the and of", "Wireless charger");
        assert_eq!(report, SimilarityReport::empty());
        assert_eq!(report.confidence, Confidence::Low);
    }

    #[test]
    fn spec_detail_null_handling() {
        let report = similarity("Bluetooth 5.2 speaker", "Bluetooth 5.3 speaker, 20W");
        let bluetooth = &report.spec_detail["bluetooth_version"];
        assert_eq!(bluetooth.value_1.as_deref(), Some("5.2"));
        assert_eq!(bluetooth.value_2.as_deref(), Some("5.3"));
        assert!(!bluetooth.consistent);

        let watts = &report.spec_detail["power_watts"];
        assert_eq!(watts.value_1, None);
        assert!(!watts.consistent);
    }
}
