//! Translation collaborator contract and the region/language tables.
//!
//! The comparison engine only ever sees text in one common language. A
//! [`Translator`] gets it there; when translation fails the original text is
//! compared instead and the failure is logged, never propagated.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Marketplace region code to its primary language.
pub const REGION_LANGUAGES: &[(&str, &str)] = &[
    ("US", "en"),
    ("IN", "en"),
    ("DE", "de"),
    ("UK", "en"),
    ("JP", "ja"),
    ("FR", "fr"),
    ("CA", "en"),
    ("AU", "en"),
    ("ES", "es"),
];

/// Language code to display name.
pub const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("de", "German"),
    ("ja", "Japanese"),
    ("fr", "French"),
    ("es", "Spanish"),
    ("hi", "Hindi"),
    ("pt", "Portuguese"),
    ("it", "Italian"),
    ("zh", "Chinese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
    ("nl", "Dutch"),
];

/// Primary language of a region; `en` for unknown regions.
pub fn region_language(region: &str) -> &'static str {
    REGION_LANGUAGES
        .iter()
        .find(|(code, _)| *code == region)
        .map_or("en", |(_, lang)| *lang)
}

/// Display name of a language code, or the code itself when unknown.
pub fn language_name(code: &str) -> &str {
    LANGUAGE_NAMES
        .iter()
        .find(|(lang, _)| *lang == code)
        .map_or(code, |(_, name)| *name)
}

const GERMAN_MARKERS: &[&str] = &[
    "und", "die", "der", "das", "ist", "für", "mit", "ein", "eine", "auf", "den", "dem", "des",
    "von", "zu", "sich", "nicht", "auch", "aus", "kann", "oder", "werden", "wird", "sind", "hab",
    "haben", "über", "nach", "bei", "durch", "wie", "noch", "nur", "sehr", "stunden", "akku",
    "kabellos", "geräuschunterdrückung", "kopfhörer", "lautsprecher", "wasserdicht", "tragbar",
    "batterie", "ladung", "qualität", "leicht", "einstellbar", "farben", "edelstahl",
];

const FRENCH_MARKERS: &[&str] = &[
    "le", "la", "les", "de", "du", "des", "un", "une", "et", "en", "est", "que", "qui", "dans",
    "pour", "pas", "sur", "ce", "avec", "sont", "son", "mais", "plus", "par", "tout", "fait",
    "comme", "heures", "batterie", "sans", "fil", "casque", "réduction", "bruit", "qualité",
    "autonomie", "étanche", "portable", "commande", "tactile", "compatible", "léger", "acier",
    "inoxydable",
];

const SPANISH_MARKERS: &[&str] = &[
    "el", "la", "los", "las", "de", "del", "en", "y", "un", "una", "es", "que", "por", "con",
    "para", "no", "son", "su", "al", "lo", "se", "como", "más", "pero", "todo", "esta", "fue",
    "horas", "batería", "inalámbrico", "auriculares", "cancelación", "ruido", "calidad",
    "resistente", "agua", "portátil", "carga", "táctil", "compatible", "acero", "inoxidable",
    "aislado",
];

/// Texts shorter than this (trimmed, in characters) are not analyzed.
const MIN_DETECTABLE_LENGTH: usize = 10;
/// Winning marker-word count needed for a European language verdict.
const MIN_MARKER_SCORE: usize = 3;

static LATIN_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Zäöüßàâéèêëïîôùûçñáéíóúü]+\b").unwrap());

fn count_in(text: &str, ranges: &[(char, char)]) -> usize {
    text.chars()
        .filter(|c| ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(c)))
        .count()
}

fn marker_score(words: &HashSet<&str>, markers: &[&str]) -> usize {
    markers.iter().filter(|marker| words.contains(*marker)).count()
}

/// Guess the language of `text`, falling back to the language of
/// `region_hint` when the text gives no clear signal.
///
/// Script ranges decide first (Japanese kana, Hangul, Devanagari, Arabic,
/// Han without kana), then counts of common German, French and Spanish words,
/// then language-specific letters.
///
/// ```
/// use listing_consistency_check::detect_language;
///
/// assert_eq!(detect_language("Kabellose Kopfhörer mit Geräuschunterdrückung und Akku", "US"), "de");
/// assert_eq!(detect_language("short", "JP"), "ja");
/// assert_eq!(detect_language("Wireless earbuds with long battery life", "DE"), "de");
/// ```
pub fn detect_language(text: &str, region_hint: &str) -> &'static str {
    let fallback = region_language(region_hint);
    if text.trim().chars().count() < MIN_DETECTABLE_LENGTH {
        return fallback;
    }

    let kana = count_in(text, &[('\u{3040}', '\u{309F}'), ('\u{30A0}', '\u{30FF}')]);
    if kana > 3 {
        return "ja";
    }
    if count_in(text, &[('\u{AC00}', '\u{D7AF}'), ('\u{1100}', '\u{11FF}')]) > 5 {
        return "ko";
    }
    if count_in(text, &[('\u{0900}', '\u{097F}')]) > 5 {
        return "hi";
    }
    if count_in(text, &[('\u{0600}', '\u{06FF}')]) > 5 {
        return "ar";
    }
    if count_in(text, &[('\u{4E00}', '\u{9FFF}')]) > 5 && kana == 0 {
        return "zh";
    }

    let lower = text.to_lowercase();
    let words: HashSet<&str> = LATIN_WORD.find_iter(&lower).map(|m| m.as_str()).collect();
    let de = marker_score(&words, GERMAN_MARKERS);
    let fr = marker_score(&words, FRENCH_MARKERS);
    let es = marker_score(&words, SPANISH_MARKERS);

    if de.max(fr).max(es) >= MIN_MARKER_SCORE {
        if de > fr && de > es {
            return "de";
        }
        if fr > de && fr > es {
            return "fr";
        }
        if es > de && es > fr {
            return "es";
        }
    }

    let has_any = |set: &str| lower.chars().any(|c| set.contains(c));
    if has_any("äöüß") {
        "de"
    } else if has_any("àâéèêëïîôùûç") && !lower.contains('ñ') {
        "fr"
    } else if has_any("ñ¿¡") {
        "es"
    } else {
        fallback
    }
}

/// Failure of the translation collaborator.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation service unavailable: {message}")]
    Unavailable { message: String },

    #[error("unsupported language pair {source_language} -> {target_language}")]
    UnsupportedPair {
        source_language: String,
        target_language: String,
    },
}

/// Translation service used to bring every region's text into one language.
pub trait Translator {
    fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, TranslationError>;

    /// Language code of `text`; defaults to the local [`detect_language`] heuristic.
    fn detect_language(&self, text: &str, region_hint: &str) -> String {
        detect_language(text, region_hint).to_string()
    }
}

/// Returns every text unchanged.
///
/// For listings authored in the target language, and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate(
        &self,
        text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<String, TranslationError> {
        Ok(text.to_string())
    }
}

/// Memoizes successful translations of an inner [`Translator`], keyed by
/// text and target language. Failures are not cached.
pub struct CachingTranslator<T> {
    inner: T,
    cache: Mutex<HashMap<(String, String), String>>,
}

impl<T: Translator> CachingTranslator<T> {
    pub fn new(inner: T) -> Self {
        CachingTranslator {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().map_or(0, |cache| cache.len())
    }
}

impl<T: Translator> Translator for CachingTranslator<T> {
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let key = (text.to_string(), target.to_string());
        if let Some(hit) = self.cache.lock().ok().and_then(|cache| cache.get(&key).cloned()) {
            return Ok(hit);
        }

        let translated = self.inner.translate(text, source, target)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, translated.clone());
        }
        Ok(translated)
    }

    fn detect_language(&self, text: &str, region_hint: &str) -> String {
        self.inner.detect_language(text, region_hint)
    }
}

/// Outcome of bringing one region's text into the target language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageInfo {
    pub detected_language: String,
    pub language_name: String,
    /// False when no translation was needed or the translator failed.
    pub was_translated: bool,
    pub original_text: String,
    /// The text to compare: the translation, or the original.
    pub translated_text: String,
}

/// Detect the language of `text` and translate it to `target` when needed.
///
/// A failed translation is logged and the original text is used in its place.
pub fn translate_text<T: Translator + ?Sized>(
    translator: &T,
    region: &str,
    text: &str,
    target: &str,
) -> LanguageInfo {
    let detected = translator.detect_language(text, region);
    let language_name = language_name(&detected).to_string();

    let translated = if detected == target {
        None
    } else {
        match translator.translate(text, &detected, target) {
            Ok(translated) => Some(translated),
            Err(err) => {
                tracing::warn!(
                    region,
                    source_language = %detected,
                    target_language = target,
                    error = %err,
                    "translation failed, comparing original text"
                );
                None
            }
        }
    };

    LanguageInfo {
        was_translated: translated.is_some(),
        translated_text: translated.unwrap_or_else(|| text.to_string()),
        original_text: text.to_string(),
        detected_language: detected,
        language_name,
    }
}
