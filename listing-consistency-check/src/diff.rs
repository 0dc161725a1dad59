//! Edit segments between two texts, for side-by-side review.

use listing_consistency::{OpTag, SequenceMatcher};
use serde::Serialize;

/// Descriptions with fewer words than this on both sides are diffed by character.
pub const CHAR_DIFF_MAX_WORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffTag {
    Equal,
    Insert,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    #[serde(rename = "type")]
    pub tag: DiffTag,
    pub text: String,
}

impl DiffSegment {
    pub fn new(tag: DiffTag, text: impl Into<String>) -> Self {
        DiffSegment {
            tag,
            text: text.into(),
        }
    }
}

/// Segments from the opcodes of `a` against `b`. A replacement becomes a
/// delete followed by an insert; `render` turns a token run into text.
pub(crate) fn segments<T, F>(a: &[T], b: &[T], render: F) -> Vec<DiffSegment>
where
    T: Eq + std::hash::Hash,
    F: Fn(&[T]) -> String,
{
    let mut out = Vec::new();
    for op in SequenceMatcher::new(a, b).opcodes() {
        let old = &a[op.a_start..op.a_end];
        let new = &b[op.b_start..op.b_end];
        match op.tag {
            OpTag::Equal => out.push(DiffSegment::new(DiffTag::Equal, render(old))),
            OpTag::Delete => out.push(DiffSegment::new(DiffTag::Delete, render(old))),
            OpTag::Insert => out.push(DiffSegment::new(DiffTag::Insert, render(new))),
            OpTag::Replace => {
                out.push(DiffSegment::new(DiffTag::Delete, render(old)));
                out.push(DiffSegment::new(DiffTag::Insert, render(new)));
            }
        }
    }
    out
}

/// Diff two descriptions.
///
/// An empty side yields a single `equal` segment holding the other side.
/// When both sides are short the diff is by character, otherwise by
/// whitespace-separated word with segments re-joined by single spaces.
///
/// ```
/// use listing_consistency_check::{description_diff, DiffTag};
///
/// let diff = description_diff(
///     "Wireless earbuds with 30 hour battery life",
///     "Wireless earbuds with 20 hour battery life",
/// );
/// let changed: Vec<_> = diff.iter().filter(|s| s.tag != DiffTag::Equal).collect();
/// assert_eq!(changed[0].text, "30");
/// assert_eq!(changed[1].text, "20");
/// ```
pub fn description_diff(description_1: &str, description_2: &str) -> Vec<DiffSegment> {
    if description_1.is_empty() || description_2.is_empty() {
        let text = if description_1.is_empty() {
            description_2
        } else {
            description_1
        };
        return vec![DiffSegment::new(DiffTag::Equal, text)];
    }

    let words_1: Vec<&str> = description_1.split_whitespace().collect();
    let words_2: Vec<&str> = description_2.split_whitespace().collect();

    if words_1.len() < CHAR_DIFF_MAX_WORDS && words_2.len() < CHAR_DIFF_MAX_WORDS {
        let chars_1: Vec<char> = description_1.chars().collect();
        let chars_2: Vec<char> = description_2.chars().collect();
        return segments(&chars_1, &chars_2, |run| run.iter().collect());
    }

    segments(&words_1, &words_2, |run| run.join(" "))
}
