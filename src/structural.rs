//! Shape comparison: character length, sentence count and bullet count.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::round4;
use crate::sentences::split_sentences;

const LENGTH_WEIGHT: f64 = 0.5;
const SENTENCE_WEIGHT: f64 = 0.3;
const BULLET_WEIGHT: f64 = 0.2;

static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\n)\s*[•\-*]\s").unwrap());

/// Structural comparison of two raw texts. Ratios are rounded to 4 digits.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StructuralMetrics {
    pub score: f64,
    pub length_ratio: f64,
    pub sentence_count_1: usize,
    pub sentence_count_2: usize,
    pub sentence_ratio: f64,
    pub char_count_1: usize,
    pub char_count_2: usize,
    pub bullet_count_1: usize,
    pub bullet_count_2: usize,
    pub bullet_ratio: f64,
}

/// `min / max`, or 1.0 when both counts are zero.
fn count_ratio(a: usize, b: usize) -> f64 {
    let max = a.max(b);
    if max == 0 {
        1.0
    } else {
        a.min(b) as f64 / max as f64
    }
}

fn bullet_count(text: &str) -> usize {
    BULLET.find_iter(text).count()
}

pub fn structural_similarity(text_1: &str, text_2: &str) -> StructuralMetrics {
    let char_count_1 = text_1.chars().count();
    let char_count_2 = text_2.chars().count();
    let sentence_count_1 = split_sentences(text_1).len();
    let sentence_count_2 = split_sentences(text_2).len();
    let bullet_count_1 = bullet_count(text_1);
    let bullet_count_2 = bullet_count(text_2);

    let length_ratio = count_ratio(char_count_1, char_count_2);
    let sentence_ratio = count_ratio(sentence_count_1, sentence_count_2);
    let bullet_ratio = count_ratio(bullet_count_1, bullet_count_2);
    let score =
        LENGTH_WEIGHT * length_ratio + SENTENCE_WEIGHT * sentence_ratio + BULLET_WEIGHT * bullet_ratio;

    StructuralMetrics {
        score: round4(score),
        length_ratio: round4(length_ratio),
        sentence_count_1,
        sentence_count_2,
        sentence_ratio: round4(sentence_ratio),
        char_count_1,
        char_count_2,
        bullet_count_1,
        bullet_count_2,
        bullet_ratio: round4(bullet_ratio),
    }
}
