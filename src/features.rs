//! Attribute tokens detected in raw listing text.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Flat set of lowercase attribute tokens.
pub type FeatureSet = BTreeSet<String>;

/// Color names matched as substrings. Multi-word colors fold to one token.
pub const COLORS: &[&str] = &[
    "black", "white", "red", "blue", "green", "yellow", "orange", "purple", "pink", "brown",
    "gray", "grey", "silver", "gold", "bronze", "rose gold", "navy", "teal", "coral", "beige",
    "cream", "midnight", "space gray",
];

/// Domain keywords matched as substrings.
pub const FEATURE_KEYWORDS: &[&str] = &[
    "bluetooth", "wireless", "wired", "usb", "nfc", "wifi", "gps", "touchscreen", "oled", "lcd",
    "amoled", "retina", "stereo", "mono", "surround", "dolby", "atmos", "waterproof",
    "dustproof", "shockproof", "sweatproof", "rechargeable", "replaceable", "removable",
    "foldable", "portable", "compact", "adjustable", "leather", "metal", "aluminum", "plastic",
    "silicone", "fabric", "microphone", "mic", "speaker", "driver", "amplifier", "ios",
    "android", "windows", "macos", "linux",
];

static UNIT_QUANTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\d+\.?\d*\s*(?:oz|ml|l|gb|mb|tb|mah|ah|v|w|hz|hours?|hrs?|mins?|minutes?|days?|inch|inches|cm|mm|feet|ft|atm)",
    )
    .unwrap()
});
static IP_RATING: Lazy<Regex> = Lazy::new(|| Regex::new(r"ipx?\d+").unwrap());
static BRAND_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z][a-zA-Z]{2,}\b").unwrap());

/// Extract attribute tokens from raw (non-normalized) text.
///
/// Unit quantities lose their internal whitespace (`"32 oz"` becomes
/// `"32oz"`). Brand-like tokens are capitalized words in the original casing,
/// stored lowercased.
pub fn extract_features(text: &str) -> FeatureSet {
    let mut features = FeatureSet::new();
    let lower = text.to_lowercase();

    for quantity in UNIT_QUANTITY.find_iter(&lower) {
        features.insert(quantity.as_str().split_whitespace().collect());
    }
    for rating in IP_RATING.find_iter(&lower) {
        features.insert(rating.as_str().to_string());
    }
    for color in COLORS {
        if lower.contains(color) {
            features.insert(color.replace(' ', ""));
        }
    }
    for brand in BRAND_LIKE.find_iter(text) {
        features.insert(brand.as_str().to_lowercase());
    }
    for keyword in FEATURE_KEYWORDS {
        if lower.contains(keyword) {
            features.insert((*keyword).to_string());
        }
    }

    features
}
