//! Parser for scenario fixtures and their check expressions.

use listing_consistency_check::RegionListing;

use crate::errors::{SpecError, SpecResult};
use crate::fixture::{Check, CompareOp, RawFixture, ScenarioFixture};

/// Operators in the order they are tried; two-character forms first so that
/// `>=` is not read as `=`.
const OPERATORS: [(&str, CompareOp); 4] = [
    (">=", CompareOp::Gte),
    ("<=", CompareOp::Lte),
    ("~=", CompareOp::Contains),
    ("=", CompareOp::Equals),
];

/// Parse one check expression such as `issues.high >= 2`.
///
/// `index` is the 1-based position used in error messages and failure
/// references.
pub fn parse_check(input: &str, index: usize) -> SpecResult<Check> {
    let input = input.trim();
    let (position, symbol, operator) = OPERATORS
        .iter()
        .filter_map(|(symbol, op)| input.find(symbol).map(|pos| (pos, *symbol, *op)))
        .min_by_key(|(pos, symbol, _)| (*pos, std::cmp::Reverse(symbol.len())))
        .ok_or_else(|| SpecError::Parse {
            check: index,
            message: format!("no operator in {:?}", input),
        })?;

    let field = input[..position].trim();
    let expected = input[position + symbol.len()..].trim();

    if field.is_empty() {
        return Err(SpecError::Parse {
            check: index,
            message: format!("missing field in {:?}", input),
        });
    }
    if field.contains(char::is_whitespace) {
        return Err(SpecError::Parse {
            check: index,
            message: format!("field {:?} contains whitespace", field),
        });
    }
    if expected.is_empty() {
        return Err(SpecError::Parse {
            check: index,
            message: format!("missing expected value in {:?}", input),
        });
    }

    Ok(Check {
        field: field.to_string(),
        expected: unquote(expected).to_string(),
        operator,
        index,
    })
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse a complete fixture document.
pub fn parse_fixture(content: &str) -> SpecResult<ScenarioFixture> {
    let raw: RawFixture = toml::from_str(content).map_err(|e| SpecError::Load {
        path: "<fixture>".to_string(),
        message: e.to_string(),
    })?;

    if raw.listings.is_empty() {
        return Err(SpecError::Invalid {
            message: "fixture has no [[listing]] tables".to_string(),
        });
    }

    let checks = raw
        .checks
        .iter()
        .enumerate()
        .map(|(i, expression)| parse_check(expression, i + 1))
        .collect::<SpecResult<Vec<_>>>()?;

    let listings = raw
        .listings
        .into_iter()
        .map(|listing| RegionListing::new(listing.region, listing.title, listing.description))
        .collect();

    Ok(ScenarioFixture {
        title: raw.title,
        listings,
        config: raw.config.unwrap_or_default(),
        checks,
    })
}
