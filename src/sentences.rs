//! Sentence splitting and greedy one-to-one sentence alignment.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::round4;
use crate::sequence::sequence_ratio;

/// Pairs scoring below this are unrelated, not weak matches.
pub const ALIGNMENT_THRESHOLD: f64 = 0.35;

/// Segments longer than this (in characters) are split again on commas.
const RUN_ON_LENGTH: usize = 200;

/// Fragments of at most this many characters are dropped.
const MIN_SENTENCE_LENGTH: usize = 5;

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+|\n\s*[•\-*]\s*").unwrap());
static COMMA_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*").unwrap());

/// Split a description into sentences and bullet items.
///
/// Splits after `.`, `!` or `?` followed by whitespace (the punctuation stays
/// with the sentence) and on bullet markers that start a line. Long run-on
/// segments containing commas are split again before capitalized clauses.
///
/// ```
/// use listing_consistency::split_sentences;
///
/// let sentences = split_sentences("Great sound. Long battery\n- Foldable design");
/// assert_eq!(sentences, vec!["Great sound.", "Long battery", "Foldable design"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut result = Vec::new();

    for part in split_keeping_terminal(text) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if part.chars().count() > RUN_ON_LENGTH && part.contains(',') {
            result.extend(
                split_before_capitalized_clause(part)
                    .into_iter()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        } else {
            result.push(part.to_string());
        }
    }

    result
        .into_iter()
        .filter(|s| s.chars().count() > MIN_SENTENCE_LENGTH)
        .collect()
}

fn split_keeping_terminal(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for sep in SENTENCE_BREAK.find_iter(text) {
        let matched = sep.as_str();
        // a terminal mark belongs to the sentence it ends
        let end = if matched.starts_with(['.', '!', '?']) {
            sep.start() + 1
        } else {
            sep.start()
        };
        parts.push(&text[start..end]);
        start = sep.end();
    }
    parts.push(&text[start..]);

    parts
}

fn split_before_capitalized_clause(segment: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for sep in COMMA_BREAK.find_iter(segment) {
        let next = segment[sep.end()..].chars().next();
        if next.map_or(false, |c| c.is_ascii_uppercase()) {
            parts.push(&segment[start..sep.start()]);
            start = sep.end();
        }
    }
    parts.push(&segment[start..]);

    parts
}

/// One accepted sentence pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedSentence {
    pub sentence_1: String,
    pub sentence_2: String,
    pub similarity: f64,
}

/// Result of aligning two sentence lists.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SentenceAlignment {
    pub matched: Vec<MatchedSentence>,
    pub only_in_1: Vec<String>,
    pub only_in_2: Vec<String>,
    pub alignment_score: f64,
}

/// Greedy best-first alignment of two sentence lists.
///
/// Every cross pair is scored with the character sequence ratio of the
/// lowercased sentences. Pairs are visited from the highest score down; a pair
/// is accepted when neither sentence is used yet. The scan stops at the first
/// pair below [`ALIGNMENT_THRESHOLD`]. No sentence is matched twice.
pub fn align_sentences(sentences_1: &[String], sentences_2: &[String]) -> SentenceAlignment {
    match (sentences_1.is_empty(), sentences_2.is_empty()) {
        (true, true) => {
            return SentenceAlignment {
                alignment_score: 1.0,
                ..SentenceAlignment::default()
            }
        }
        (true, false) => {
            return SentenceAlignment {
                only_in_2: sentences_2.to_vec(),
                ..SentenceAlignment::default()
            }
        }
        (false, true) => {
            return SentenceAlignment {
                only_in_1: sentences_1.to_vec(),
                ..SentenceAlignment::default()
            }
        }
        (false, false) => {}
    }

    let lower_2: Vec<String> = sentences_2.iter().map(|s| s.to_lowercase()).collect();
    let mut scores: Vec<(f64, usize, usize)> = Vec::with_capacity(sentences_1.len() * sentences_2.len());
    for (i, s1) in sentences_1.iter().enumerate() {
        let lower_1 = s1.to_lowercase();
        for (j, s2) in lower_2.iter().enumerate() {
            scores.push((sequence_ratio(&lower_1, s2), i, j));
        }
    }
    // descending by score, then by index, so ties resolve deterministically
    scores.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| b.2.cmp(&a.2))
    });

    let mut used_1 = vec![false; sentences_1.len()];
    let mut used_2 = vec![false; sentences_2.len()];
    let mut matched = Vec::new();

    for (similarity, i, j) in scores {
        if used_1[i] || used_2[j] {
            continue;
        }
        if similarity < ALIGNMENT_THRESHOLD {
            break;
        }
        matched.push(MatchedSentence {
            sentence_1: sentences_1[i].clone(),
            sentence_2: sentences_2[j].clone(),
            similarity: round4(similarity),
        });
        used_1[i] = true;
        used_2[j] = true;
    }

    let only_in_1 = unused(sentences_1, &used_1);
    let only_in_2 = unused(sentences_2, &used_2);
    let total = sentences_1.len().max(sentences_2.len());

    SentenceAlignment {
        alignment_score: round4(matched.len() as f64 / total as f64),
        matched,
        only_in_1,
        only_in_2,
    }
}

fn unused(sentences: &[String], used: &[bool]) -> Vec<String> {
    sentences
        .iter()
        .zip(used)
        .filter(|&(_, &used)| !used)
        .map(|(s, _)| s.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn drops_short_fragments() {
        assert_eq!(split_sentences("Ok. Fine. This one stays."), vec!["This one stays."]);
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn splits_bullets() {
        let text = "Features:\n• Long battery life\n* Compact case\n - Fast pairing";
        assert_eq!(
            split_sentences(text),
            vec!["Features:", "Long battery life", "Compact case", "Fast pairing"]
        );
    }

    #[test]
    fn terminal_without_whitespace_does_not_split() {
        assert_eq!(split_sentences("Version 5.2 audio."), vec!["Version 5.2 audio."]);
    }

    #[test]
    fn long_run_on_splits_before_capitals() {
        let clause = "with a long description of the feature set that keeps going";
        let text = format!("Bass {clause}, Treble {clause}, and more {clause}, Mids {clause}");
        let sentences = split_sentences(&text);
        assert_eq!(sentences.len(), 3);
        assert!(sentences[0].starts_with("Bass"));
        assert!(sentences[1].starts_with("Treble"));
        assert!(sentences[1].contains(", and more"));
        assert!(sentences[2].starts_with("Mids"));
    }

    #[test]
    fn align_empty_sides() {
        let both = align_sentences(&[], &[]);
        assert!(both.matched.is_empty());
        assert_eq!(both.alignment_score, 1.0);

        let one = strings(&["Only here."]);
        let left = align_sentences(&one, &[]);
        assert_eq!(left.only_in_1, one);
        assert_eq!(left.alignment_score, 0.0);

        let right = align_sentences(&[], &one);
        assert_eq!(right.only_in_2, one);
        assert_eq!(right.alignment_score, 0.0);
    }

    #[test]
    fn align_identical() {
        let s = strings(&["Long battery life.", "Compact case."]);
        let alignment = align_sentences(&s, &s);
        assert_eq!(alignment.matched.len(), 2);
        assert!(alignment.matched.iter().all(|m| m.similarity == 1.0));
        assert_eq!(alignment.alignment_score, 1.0);
    }

    #[test]
    fn align_with_orphans() {
        let a = strings(&["Long battery life.", "Compact case.", "Zzzzzzzz"]);
        let b = strings(&["long battery life!", "compact case"]);
        let alignment = align_sentences(&a, &b);
        assert_eq!(alignment.matched.len(), 2);
        assert_eq!(alignment.only_in_1, strings(&["Zzzzzzzz"]));
        assert!(alignment.only_in_2.is_empty());
        assert_eq!(alignment.alignment_score, 0.6667);
    }

    #[test]
    fn matches_are_injective() {
        let a = strings(&["Same sentence here.", "Same sentence here."]);
        let b = strings(&["Same sentence here."]);
        let alignment = align_sentences(&a, &b);
        assert_eq!(alignment.matched.len(), 1);
        assert_eq!(alignment.only_in_1.len(), 1);
        assert_eq!(alignment.alignment_score, 0.5);
    }
}
