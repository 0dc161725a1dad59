//! Product-level consistency check across regional marketplace listings.
//!
//! [`ProductCheck`] takes one listing (title and description) per region,
//! brings every text into a common language through a [`Translator`],
//! compares every region pair with [`listing_consistency::similarity`] and
//! turns the results into severity-ranked [`Issue`]s and an overall
//! [`RiskLevel`].
//!
//! The pieces are usable on their own: [`detect`] and [`aggregate_issues`]
//! for issues, [`determine_risk`] and [`escalate`] for risk,
//! [`check_title_mismatch`] for titles and [`description_diff`] for review
//! output.
//!
//! Logging goes through `tracing`; installing a subscriber is up to the
//! embedding binary.

mod check;
mod comparison;
mod config;
mod diff;
mod issue;
mod risk;
mod title;
mod translate;

pub use check::{overall_confidence, ProductCheck, ProductReport, RegionListing, SimilarityStats};
pub use comparison::{compare_all_pairs, PairwiseAnalysis, PairwiseComparison, RegionText};
pub use config::{CheckConfig, ConfigError, IssueCaps};
pub use diff::{description_diff, DiffSegment, DiffTag, CHAR_DIFF_MAX_WORDS};
pub use issue::{
    aggregate_issues, detect, readable_spec_name, Issue, IssueCounts, IssueKind, Severity,
    CLAIM_DESCRIPTION_LIMIT, LENGTH_DISPARITY_RATIO, MAX_CLAIM_ISSUES, MAX_ORPHAN_ISSUES,
    ORPHAN_DESCRIPTION_LIMIT,
};
pub use risk::{
    classify, determine_risk, escalate, RiskLevel, HIGH_ISSUE_OVERRIDE, LOW_RISK_AVERAGE,
    LOW_RISK_MINIMUM, MEDIUM_RISK_AVERAGE, MEDIUM_RISK_MINIMUM,
};
pub use title::{
    check_title_mismatch, title_diff, title_similarity, tokenize_title, TitleAnalysis,
    TitleMismatch, TITLE_JACCARD_WEIGHT, TITLE_SEQUENCE_WEIGHT,
};
pub use translate::{
    detect_language, language_name, region_language, translate_text, CachingTranslator,
    LanguageInfo, PassthroughTranslator, TranslationError, Translator, LANGUAGE_NAMES,
    REGION_LANGUAGES,
};

#[cfg(test)]
mod tests {
    mod config;
    mod issues;
    mod product_check;
}
