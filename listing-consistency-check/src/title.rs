//! Title comparison across regions.
//!
//! Translated titles drift lexically even when they name the same product, so
//! title similarity blends word overlap with character order and the default
//! mismatch threshold sits well below 1.0.

use listing_consistency::{round4, sequence_ratio, word_jaccard};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::comparison::RegionText;
use crate::diff::{segments, DiffSegment};

pub const TITLE_JACCARD_WEIGHT: f64 = 0.4;
pub const TITLE_SEQUENCE_WEIGHT: f64 = 0.6;

static TITLE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[^\w\s]").unwrap());

/// Word runs and single punctuation characters.
///
/// ```
/// use listing_consistency_check::tokenize_title;
///
/// assert_eq!(tokenize_title("WH-1000XM4, Black"), vec!["WH", "-", "1000XM4", ",", "Black"]);
/// ```
pub fn tokenize_title(text: &str) -> Vec<&str> {
    TITLE_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Blend of word-set Jaccard and character sequence ratio over the
/// lowercased titles.
pub fn title_similarity(title_1: &str, title_2: &str) -> f64 {
    let lower_1 = title_1.to_lowercase();
    let lower_2 = title_2.to_lowercase();

    TITLE_JACCARD_WEIGHT * word_jaccard(&lower_1, &lower_2)
        + TITLE_SEQUENCE_WEIGHT * sequence_ratio(&lower_1, &lower_2)
}

/// Word tokens get a leading space, punctuation attaches directly.
fn join_title_tokens(tokens: &[&str]) -> String {
    let mut text = String::new();
    for token in tokens {
        if token.chars().all(char::is_alphanumeric) {
            text.push(' ');
        }
        text.push_str(token);
    }
    text.trim().to_string()
}

/// Token-level diff of two titles.
pub fn title_diff(title_1: &str, title_2: &str) -> Vec<DiffSegment> {
    let tokens_1 = tokenize_title(title_1);
    let tokens_2 = tokenize_title(title_2);
    segments(&tokens_1, &tokens_2, join_title_tokens)
}

/// A region pair whose titles fell below the mismatch threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleMismatch {
    pub region_1: String,
    pub region_2: String,
    pub title_1: String,
    pub title_2: String,
    pub similarity: f64,
    pub diff: Vec<DiffSegment>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TitleAnalysis {
    pub is_mismatch: bool,
    /// The titles that were compared, in input order.
    pub titles: Vec<RegionText>,
    pub mismatches: Vec<TitleMismatch>,
}

/// Compare every pair of titles (input order, first before second) and
/// record the pairs scoring below `threshold`.
pub fn check_title_mismatch(titles: &[RegionText], threshold: f64) -> TitleAnalysis {
    let mut mismatches = Vec::new();

    for (i, first) in titles.iter().enumerate() {
        for second in &titles[i + 1..] {
            let similarity = title_similarity(&first.text, &second.text);
            if similarity < threshold {
                mismatches.push(TitleMismatch {
                    region_1: first.region.clone(),
                    region_2: second.region.clone(),
                    title_1: first.text.clone(),
                    title_2: second.text.clone(),
                    similarity: round4(similarity),
                    diff: title_diff(&first.text, &second.text),
                });
            }
        }
    }

    TitleAnalysis {
        is_mismatch: !mismatches.is_empty(),
        titles: titles.to_vec(),
        mismatches,
    }
}
