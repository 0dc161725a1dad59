//! Named numeric specifications and their cross-region consistency.
//!
//! [`SPEC_PATTERNS`] is an ordered table. Patterns overlap (a "5 h" battery
//! claim and a "5 hz" refresh rate share a prefix, grams and kilograms share a
//! suffix), so each spec name owns exactly one pattern and the first match of
//! that pattern in the text is the stored value.
//!
//! Values stay strings. Comparison is exact string equality after thousands
//! separators are stripped, so `"5.0"` and `"5"` are different values.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Spec name to extracted value, one map per text.
pub type SpecMap = BTreeMap<String, String>;

/// Ordered `(spec name, pattern)` table. Patterns run against lowercased text
/// and capture the value in group 1.
pub const SPEC_PATTERNS: &[(&str, &str)] = &[
    // Battery / power
    (
        "battery_life_hours",
        r"(\d+)\s*(?:-\s*)?(?:hour|hr|h)\b(?:\s*(?:battery|playback|listening|autonomie|uso|akku|バッテリー))?",
    ),
    ("battery_capacity_mah", r"(\d[\d\s.,]*\d)\s*mah\b"),
    ("power_watts", r"(\d+)\s*w(?:att)?s?\b"),
    ("pd_watts", r"pd\s*(\d+)\s*w"),
    // Display
    (
        "screen_size_inches",
        r#"(\d+\.?\d*)\s*(?:-?\s*)?(?:inch|in|"|pouces?|pulgadas?|zoll|インチ)"#,
    ),
    ("brightness_nits", r"(\d+)\s*(?:x\s*\d+)?\s*(?:nit|nits)\b"),
    ("refresh_rate_hz", r"(\d+)\s*hz\b(?:\s*(?:refresh|display))?"),
    // Weight
    (
        "weight_oz",
        r"(?:weigh(?:s|t|ing)?|wt\.?)\s*(\d+\.?\d*)\s*(?:oz|ounces?)\b",
    ),
    ("weight_kg", r"(\d+\.?\d*)\s*(?:kg|kilogram)s?\b"),
    ("weight_grams", r"(\d+\.?\d*)\s*g(?:ram)?s?\b"),
    ("weight_lbs", r"(\d+\.?\d*)\s*(?:lb|pound)s?\b"),
    // Capacity
    ("capacity_oz", r"(\d+)\s*(?:fl\.?\s*)?oz\b"),
    ("capacity_ml", r"(\d+)\s*ml\b"),
    ("capacity_liters", r"(\d+\.?\d*)\s*(?:liter|litre|l)\b"),
    // Connectivity
    ("bluetooth_version", r"bluetooth\s*(\d+\.?\d*)"),
    ("usb_version", r"usb\s*(\d+\.?\d*)"),
    ("wifi_generation", r"wi-?fi\s*(\d+)"),
    // Water resistance
    ("ip_rating", r"(ipx?\d+)\b"),
    ("water_resistance_atm", r"(\d+)\s*atm\b"),
    // Storage
    ("storage_gb", r"(\d+)\s*gb\b"),
    ("storage_tb", r"(\d+)\s*tb\b"),
    ("camera_mp", r"(\d+)\s*(?:mp|megapixel)\b"),
    ("speed_ghz", r"(\d+\.?\d*)\s*ghz\b"),
    // Counts
    ("sport_modes", r"(\d+)\s*(?:sport|exercise|workout)\s*mode"),
    (
        "battery_life_days",
        r"(\d+)\s*(?:-\s*)?(?:day|days|jour|días?|tage|日間?)\b(?:\s*(?:battery|akku|batería|batterie))?",
    ),
    (
        "color_options",
        r"(\d+)\s*(?:color|colour|farb|colori|couleur|colore)s?\b",
    ),
    ("ports_count", r"(\d+)\s*(?:port|anschlüss|puerto)s?\b"),
    ("driver_size_mm", r"(\d+)\s*mm\s*(?:driver|treiber)"),
    ("noise_reduction_db", r"(\d+)\s*db\b"),
    (
        "quick_charge_minutes",
        r"(\d+)\s*(?:min|minute)s?\s*(?:charge|charging|laden|carga)",
    ),
];

static COMPILED_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SPEC_PATTERNS
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).unwrap()))
        .collect()
});

/// Extract every recognized spec from `text`.
///
/// ```
/// use listing_consistency::extract_specs;
///
/// let specs = extract_specs("20000mAh power bank, 65W output");
/// assert_eq!(specs["battery_capacity_mah"], "20000");
/// assert_eq!(specs["power_watts"], "65");
/// ```
pub fn extract_specs(text: &str) -> SpecMap {
    let lower = text.to_lowercase();
    let mut specs = SpecMap::new();

    for (name, pattern) in COMPILED_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&lower) {
            let raw = caps.get(1).or_else(|| caps.get(0)).map_or("", |m| m.as_str());
            specs.insert((*name).to_string(), strip_thousands_separators(raw));
        }
    }

    specs
}

/// Remove a space, comma or dot that is directly followed by exactly three
/// digits and then a non-digit or the end of the value.
///
/// `"5,000"`, `"5 000"` and `"5.000"` all become `"5000"`; `"5.2"` is kept.
pub fn strip_thousands_separators(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());

    for (idx, &c) in chars.iter().enumerate() {
        let is_separator = c == ',' || c == '.' || c.is_whitespace();
        if is_separator && precedes_digit_group(&chars[idx + 1..]) {
            continue;
        }
        out.push(c);
    }

    out
}

fn precedes_digit_group(rest: &[char]) -> bool {
    rest.len() >= 3
        && rest[..3].iter().all(|c| c.is_numeric())
        && rest.get(3).map_or(true, |c| !c.is_numeric())
}

/// Cross-region view of one spec name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossRegionSpecEntry {
    /// Region code to observed value, restricted to regions where the spec was found.
    pub values: BTreeMap<String, String>,
    /// At most one distinct value among `values`.
    pub consistent: bool,
    /// Regions with a value, in input order.
    pub regions_present: Vec<String>,
    /// Regions without a value, in input order.
    pub regions_missing: Vec<String>,
}

impl CrossRegionSpecEntry {
    pub fn value_for(&self, region: &str) -> Option<&str> {
        self.values.get(region).map(String::as_str)
    }
}

/// Build the cross-region table for every spec name seen in any region.
///
/// `specs_by_region` is ordered; the order carries into `regions_present` and
/// `regions_missing`. Keys of the returned map are sorted.
pub fn compare_across_regions(
    specs_by_region: &[(String, SpecMap)],
) -> BTreeMap<String, CrossRegionSpecEntry> {
    let mut analysis = BTreeMap::new();

    let names: std::collections::BTreeSet<&String> = specs_by_region
        .iter()
        .flat_map(|(_, specs)| specs.keys())
        .collect();

    for name in names {
        let mut values = BTreeMap::new();
        let mut regions_present = Vec::new();
        let mut regions_missing = Vec::new();

        for (region, specs) in specs_by_region {
            match specs.get(name) {
                Some(value) => {
                    values.insert(region.clone(), value.clone());
                    regions_present.push(region.clone());
                }
                None => regions_missing.push(region.clone()),
            }
        }

        let distinct: std::collections::BTreeSet<&String> = values.values().collect();
        analysis.insert(
            name.clone(),
            CrossRegionSpecEntry {
                consistent: distinct.len() <= 1,
                values,
                regions_present,
                regions_missing,
            },
        );
    }

    analysis
}
