//! Text comparison engine for product listings across regional marketplaces.
//!
//! Given two descriptions already translated into a common language, the
//! engine produces a combined 0–1 similarity score, a confidence label and the
//! supporting detail needed to explain the score: a sentence alignment, a
//! per-spec comparison table, content gaps and structural metrics.
//!
//! ## Components
//!
//! - [`normalize`] - canonical token stream for the text-level signals
//! - [`extract_features`] / [`extract_specs`] - attribute tokens and named numeric specs
//! - [`compare_across_regions`] - spec consistency over any number of regions
//! - [`split_sentences`] / [`align_sentences`] - greedy one-to-one sentence alignment
//! - [`SequenceMatcher`] - Ratcliff/Obershelp matching, ratios and edit opcodes
//! - [`structural_similarity`] / [`find_gaps`] - shape and claim coverage
//! - [`similarity`] - all nine signals combined into a [`SimilarityReport`]
//! - [`AlignmentDisplay`] - text rendering of an alignment for review
//!
//! Everything here is pure and synchronous; nothing does I/O or logs.
//!
//! ## Example
//!
//! ```
//! use listing_consistency::similarity;
//!
//! let report = similarity(
//!     "Wireless earbuds. 30-hour battery, IPX4 waterproof.",
//!     "Wireless earbuds. 20-hour battery, IPX4 waterproof.",
//! );
//! assert!(report.scores.spec_match < 1.0);
//! assert!(!report.spec_detail["battery_life_hours"].consistent);
//! ```

mod display;
mod features;
mod gaps;
mod normalize;
mod overlap;
mod sentences;
mod sequence;
mod similarity;
mod specs;
mod structural;
mod tfidf;

pub use display::AlignmentDisplay;
pub use features::{extract_features, FeatureSet, COLORS, FEATURE_KEYWORDS};
pub use gaps::{extract_claims, find_gaps, ContentGaps, CLAIM_PATTERNS};
pub use normalize::{normalize, STOP_WORDS, SYNONYMS};
pub use overlap::{bigram_jaccard, dice_coefficient, jaccard, word_jaccard, NGRAM_SIZE};
pub use sentences::{
    align_sentences, split_sentences, MatchedSentence, SentenceAlignment, ALIGNMENT_THRESHOLD,
};
pub use sequence::{sequence_ratio, MatchBlock, OpTag, Opcode, SequenceMatcher};
pub use similarity::{
    similarity, spec_match, Confidence, SimilarityReport, SimilarityScores, SpecDetail,
    BIGRAM_JACCARD_WEIGHT, FEATURE_OVERLAP_WEIGHT, NGRAM_DICE_WEIGHT, SENTENCE_ALIGNMENT_WEIGHT,
    SEQUENCE_WEIGHT, SPEC_MATCH_WEIGHT, STRUCTURAL_WEIGHT, TFIDF_WEIGHT, WORD_JACCARD_WEIGHT,
};
pub use specs::{
    compare_across_regions, extract_specs, strip_thousands_separators, CrossRegionSpecEntry,
    SpecMap, SPEC_PATTERNS,
};
pub use structural::{structural_similarity, StructuralMetrics};
pub use tfidf::{tfidf_cosine, TfidfError, MAX_FEATURES};

/// Round to 4 decimal digits, the precision of every reported score.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
