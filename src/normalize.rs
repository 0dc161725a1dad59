//! Canonicalization of raw listing text into a comparison-ready token stream.
//!
//! [`normalize`] lowercases, strips URLs and emails, folds unicode punctuation
//! and unit phrases, removes punctuation, folds synonyms, and drops stop words
//! and short numeric noise. The word tables are exposed as ordered constants.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Closed set of function words removed from normalized text.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "shall", "can", "need",
    "this", "that", "these", "those", "i", "you", "he", "she", "it", "we", "they", "what",
    "which", "who", "whom", "whose", "where", "when", "why", "how", "all", "each", "every",
    "both", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only", "own",
    "same", "so", "than", "too", "very", "just", "also", "now", "here", "there", "then", "once",
    "if", "unless", "until", "while", "about", "above", "after", "again", "against", "any",
    "because", "before", "being", "below", "between", "into", "through", "during", "out", "off",
    "over", "under", "further", "up", "down", "your", "our", "their", "its", "my", "his", "her",
    "like", "get", "make", "made",
];

/// Synonym table, in lookup order.
///
/// Single-word keys replace whole tokens. Keys containing a space are phrase
/// rewrites applied to the joined text afterwards, longest phrase first. Keys
/// containing `/` or `&` are rewritten before punctuation is removed.
pub const SYNONYMS: &[(&str, &str)] = &[
    // British / American spelling
    ("colour", "color"),
    ("colours", "colors"),
    ("grey", "gray"),
    ("aluminium", "aluminum"),
    ("centre", "center"),
    ("metre", "meter"),
    ("metres", "meters"),
    ("litre", "liter"),
    ("litres", "liters"),
    ("favourite", "favorite"),
    ("favourites", "favorites"),
    ("organisation", "organization"),
    ("realise", "realize"),
    ("realised", "realized"),
    ("recognise", "recognize"),
    ("recognised", "recognized"),
    ("travelling", "traveling"),
    ("travelled", "traveled"),
    ("cancelled", "canceled"),
    ("cancelling", "canceling"),
    ("labelled", "labeled"),
    ("labelling", "labeling"),
    ("modelled", "modeled"),
    ("modelling", "modeling"),
    ("jewellery", "jewelry"),
    ("aeroplane", "airplane"),
    ("defence", "defense"),
    ("licence", "license"),
    ("offence", "offense"),
    ("practise", "practice"),
    ("analyse", "analyze"),
    ("analysed", "analyzed"),
    ("programme", "program"),
    ("programmes", "programs"),
    ("tyre", "tire"),
    ("tyres", "tires"),
    ("whilst", "while"),
    ("amongst", "among"),
    ("towards", "toward"),
    ("afterwards", "afterward"),
    ("customise", "customize"),
    ("customised", "customized"),
    ("organise", "organize"),
    ("organised", "organized"),
    // Product vocabulary
    ("cordless", "wireless"),
    ("bt", "bluetooth"),
    ("noisecanceling", "noisecanceling"),
    ("noisecancelling", "noisecanceling"),
    ("noise-canceling", "noisecanceling"),
    ("noise-cancelling", "noisecanceling"),
    ("anc", "noisecanceling"),
    // Time units
    ("hrs", "hours"),
    ("hr", "hour"),
    ("mins", "minutes"),
    ("min", "minute"),
    ("secs", "seconds"),
    ("sec", "second"),
    // Abbreviations
    ("w/", "with"),
    ("w/o", "without"),
    ("&", "and"),
    // Audio
    ("hi-fi", "hifi"),
    ("high-fidelity", "hifi"),
    ("hi-res", "highresolution"),
    ("high-res", "highresolution"),
    // Connectors
    ("usb-c", "usbc"),
    ("type-c", "typec"),
    ("usb c", "usbc"),
    ("type c", "typec"),
    ("built-in", "builtin"),
    ("built in", "builtin"),
    // Durability
    ("water-resistant", "waterresistant"),
    ("water resistant", "waterresistant"),
    ("water-proof", "waterproof"),
    ("waterresistant", "waterproof"),
    ("sweat-proof", "sweatproof"),
    ("sweat proof", "sweatproof"),
    ("dust-proof", "dustproof"),
    ("dust proof", "dustproof"),
    ("shock-proof", "shockproof"),
    ("shock proof", "shockproof"),
    // Weight
    ("light-weight", "lightweight"),
    ("light weight", "lightweight"),
    ("ultra-light", "ultralight"),
    ("ultra light", "ultralight"),
    // Quality
    ("eco-friendly", "ecofriendly"),
    ("eco friendly", "ecofriendly"),
    ("user-friendly", "userfriendly"),
    ("user friendly", "userfriendly"),
    ("high-quality", "highquality"),
    ("high quality", "highquality"),
    ("top-quality", "highquality"),
    ("top quality", "highquality"),
    ("premium-quality", "highquality"),
    ("premium quality", "highquality"),
    // Features
    ("hands-free", "handsfree"),
    ("hands free", "handsfree"),
    ("quick-charge", "quickcharge"),
    ("quick charge", "quickcharge"),
    ("fast-charge", "fastcharge"),
    ("fast charge", "fastcharge"),
    ("rapid-charge", "quickcharge"),
    ("rapid charge", "quickcharge"),
    ("fast charging", "quickcharge"),
    ("quick charging", "quickcharge"),
    // Superlatives
    ("superior", "premium"),
    ("excellent", "premium"),
    ("outstanding", "premium"),
    ("exceptional", "premium"),
    ("remarkable", "premium"),
];

/// Upper bound on repeated passes while waiting for a stable output.
const MAX_PASSES: usize = 4;

static STOP_WORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOP_WORDS.iter().copied().collect());

static TOKEN_SYNONYMS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| SYNONYMS.iter().copied().collect());

static PHRASE_SYNONYMS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut phrases: Vec<_> = SYNONYMS
        .iter()
        .copied()
        .filter(|(phrase, _)| phrase.contains(' '))
        .collect();
    // stable: equal lengths keep table order
    phrases.sort_by_key(|(phrase, _)| std::cmp::Reverse(phrase.chars().count()));
    phrases
});

/// Symbolic abbreviations, longest first, matched on word boundaries where
/// the key starts or ends with a word character.
static SYMBOLIC_SYNONYMS: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    let mut symbolic: Vec<_> = SYNONYMS
        .iter()
        .copied()
        .filter(|(key, _)| is_symbolic(key))
        .collect();
    symbolic.sort_by_key(|(key, _)| std::cmp::Reverse(key.chars().count()));
    symbolic
        .into_iter()
        .map(|(key, replacement)| {
            let starts_word = key.starts_with(|c: char| c.is_alphanumeric());
            let ends_word = key.ends_with(|c: char| c.is_alphanumeric());
            let pattern = format!(
                "{}{}{}",
                if starts_word { r"\b" } else { "" },
                regex::escape(key),
                if ends_word { r"\b" } else { "" },
            );
            (Regex::new(&pattern).unwrap(), format!(" {} ", replacement))
        })
        .collect()
});

fn is_symbolic(key: &str) -> bool {
    key.contains(|c: char| c == '/' || c == '&')
}

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").unwrap());
static HOURS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*-?\s*hours?").unwrap());
static MINUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*-?\s*minutes?").unwrap());
static DAYS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*-?\s*days?").unwrap());
static IP_RATING: Lazy<Regex> = Lazy::new(|| Regex::new(r"ipx?(\d+)").unwrap());
static ATM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*atm\b").unwrap());

/// Normalize raw text for comparison.
///
/// Total and deterministic; empty or whitespace-only input yields an empty
/// string. Normalizing an already normalized string returns it unchanged.
///
/// ```
/// use listing_consistency::normalize;
///
/// assert_eq!(normalize("Colour: Grey, 500 ml bottle"), "color gray 500 ml bottle");
/// assert_eq!(normalize("   "), "");
/// ```
pub fn normalize(text: &str) -> String {
    let mut current = normalize_pass(text);
    for _ in 1..MAX_PASSES {
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn normalize_pass(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let text = text.to_lowercase();
    let text = URL.replace_all(&text, " ");
    let text = EMAIL.replace_all(&text, " ");

    let text = fold_unicode_punctuation(&text);
    let text: String = text.nfkc().collect::<String>().to_lowercase();

    let text = HOURS.replace_all(&text, "${1} hour");
    let text = MINUTES.replace_all(&text, "${1} minute");
    let text = DAYS.replace_all(&text, "${1} day");
    let text = IP_RATING.replace_all(&text, "iprating${1}");
    let mut text = ATM.replace_all(&text, "${1}atmospheres").into_owned();
    for (pattern, replacement) in SYMBOLIC_SYNONYMS.iter() {
        text = pattern.replace_all(&text, replacement.as_str()).into_owned();
    }

    let text: String = text
        .chars()
        .map(|c| if c == '-' || c.is_ascii_punctuation() { ' ' } else { c })
        .collect();

    let joined = text
        .split_whitespace()
        .map(|word| TOKEN_SYNONYMS.get(word).copied().unwrap_or(word))
        .collect::<Vec<_>>()
        .join(" ");

    let mut joined = joined;
    for (phrase, replacement) in PHRASE_SYNONYMS.iter() {
        if joined.contains(phrase) {
            joined = joined.replace(phrase, replacement);
        }
    }

    joined
        .split_whitespace()
        .filter(|word| !STOP_WORD_SET.contains(word) && word.chars().count() > 1)
        .filter(|word| !is_short_number(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_unicode_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '™' | '®' | '©' | '\u{2026}' => ' ',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            other => other,
        })
        .collect()
}

/// Purely numeric token of at most two characters.
fn is_short_number(word: &str) -> bool {
    word.chars().count() <= 2 && word.chars().all(char::is_numeric)
}
