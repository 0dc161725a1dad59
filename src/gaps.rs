//! Product claims present in one text but not covered by the other.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Claim patterns, matched against lowercased text in this order.
pub const CLAIM_PATTERNS: &[&str] = &[
    r"(?:compatible\s+with|works\s+with|supports?)\s+[\w\s,&+]+",
    r"(?:includes?|comes?\s+with|equipped\s+with|features?)\s+[\w\s,&+]+",
    r"(?:up\s+to\s+)\d+[\w\s]+",
    r"(?:available\s+in)\s+[\w\s,&+]+",
    r"(?:designed\s+for|perfect\s+for|ideal\s+for|suitable\s+for|great\s+for)\s+[\w\s,&+]+",
    r"(?:approved|certified|rated)\s+(?:for|by)\s+[\w\s]+",
    r"(?:airline|flight|cabin)\s+(?:approved|safe|friendly)",
    r"(?:bpa|lead|phthalate)\s*-?\s*free",
    r"(?:foldable|collapsible|portable|adjustable|removable|detachable)",
    r"(?:touch\s+(?:control|sensor)|voice\s+(?:control|assistant|command))",
    r"(?:fast|quick|rapid|turbo)\s+charg(?:e|ing)",
    r"(?:noise\s+cancel(?:l?ing|l?ation)|anc|enc)",
];

/// Claims shorter than this many characters (after trimming) are ignored.
const MIN_CLAIM_LENGTH: usize = 6;

static COMPILED_CLAIMS: Lazy<Vec<Regex>> = Lazy::new(|| {
    CLAIM_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
});

/// Uncovered claims on each side.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ContentGaps {
    pub only_in_1: Vec<String>,
    pub only_in_2: Vec<String>,
}

/// All claim matches in `text`, grouped by pattern in table order.
pub fn extract_claims(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    COMPILED_CLAIMS
        .iter()
        .flat_map(|pattern| pattern.find_iter(&lower))
        .map(|m| m.as_str().trim().to_string())
        .filter(|claim| claim.chars().count() >= MIN_CLAIM_LENGTH)
        .collect()
}

/// A claim is covered by `other_lower` when its last two words, or the
/// whole claim, occur there as a substring.
fn is_covered(claim: &str, other_lower: &str) -> bool {
    let words: Vec<&str> = claim.split_whitespace().collect();
    let core = words[words.len().saturating_sub(2)..].join(" ");
    other_lower.contains(&core) || other_lower.contains(claim)
}

pub fn find_gaps(text_1: &str, text_2: &str) -> ContentGaps {
    let lower_1 = text_1.to_lowercase();
    let lower_2 = text_2.to_lowercase();

    ContentGaps {
        only_in_1: extract_claims(text_1)
            .into_iter()
            .filter(|claim| !is_covered(claim, &lower_2))
            .collect(),
        only_in_2: extract_claims(text_2)
            .into_iter()
            .filter(|claim| !is_covered(claim, &lower_1))
            .collect(),
    }
}
