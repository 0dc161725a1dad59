//! Text rendering of sentence alignments for review and snapshots.

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::sentences::SentenceAlignment;

/// Side-by-side text rendering of a [`SentenceAlignment`].
///
/// ```text
/// Long battery life.  ─ 0.9444 ─  long battery life!
/// Zzzzzzzz            ◀
///                     ▶           extra one
/// alignment 0.6667
/// ```
///
/// Matched pairs come first with their similarity, then sentences only in the
/// first text (`◀`), then sentences only in the second (`▶`). Columns are
/// padded by display width so wide characters stay aligned.
pub struct AlignmentDisplay<'a> {
    alignment: &'a SentenceAlignment,
}

impl<'a> AlignmentDisplay<'a> {
    pub fn new(alignment: &'a SentenceAlignment) -> Self {
        AlignmentDisplay { alignment }
    }

    fn left_column_width(&self) -> usize {
        self.alignment
            .matched
            .iter()
            .map(|pair| pair.sentence_1.as_str())
            .chain(self.alignment.only_in_1.iter().map(String::as_str))
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0)
    }
}

fn pad(line: &mut String, count: usize) {
    line.extend(std::iter::repeat(' ').take(count));
}

impl<'a> std::fmt::Display for AlignmentDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        // "─ 0.0000 ─" between two paddings
        const GUTTER_WIDTH: usize = 10;

        let width = self.left_column_width();

        for pair in &self.alignment.matched {
            let mut line = pair.sentence_1.clone();
            let used = UnicodeWidthStr::width(line.as_str());
            pad(&mut line, width - used + SPACE_PADDING);
            write!(&mut line, "─ {:.4} ─", pair.similarity)?;
            pad(&mut line, SPACE_PADDING);
            line.push_str(&pair.sentence_2);
            writeln!(f, "{}", line)?;
        }

        for sentence in &self.alignment.only_in_1 {
            let mut line = sentence.clone();
            let used = UnicodeWidthStr::width(line.as_str());
            pad(&mut line, width - used + SPACE_PADDING);
            line.push('◀');
            writeln!(f, "{}", line)?;
        }

        for sentence in &self.alignment.only_in_2 {
            let mut line = String::new();
            pad(&mut line, width + SPACE_PADDING);
            line.push('▶');
            pad(&mut line, GUTTER_WIDTH - 1 + SPACE_PADDING);
            line.push_str(sentence);
            writeln!(f, "{}", line)?;
        }

        write!(f, "alignment {:.4}", self.alignment.alignment_score)
    }
}
