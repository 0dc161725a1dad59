//! Set and multiset overlap measures over characters and words.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Character n-gram length used by [`dice_coefficient`].
pub const NGRAM_SIZE: usize = 3;

fn char_ngrams(text: &str, n: usize) -> HashMap<String, usize> {
    let chars: Vec<char> = text.trim().to_lowercase().chars().collect();
    let mut grams = HashMap::new();
    if chars.len() < n {
        return grams;
    }
    for window in chars.windows(n) {
        *grams.entry(window.iter().collect::<String>()).or_insert(0) += 1;
    }
    grams
}

/// Sørensen–Dice coefficient over character trigram multisets.
///
/// `2·|A∩B| / (|A|+|B|)` with multiset intersection. Either text empty, or
/// both too short to form a trigram, gives 0.0.
///
/// ```
/// use listing_consistency::dice_coefficient;
///
/// assert_eq!(dice_coefficient("wireless", "wireless"), 1.0);
/// assert_eq!(dice_coefficient("", "wireless"), 0.0);
/// ```
pub fn dice_coefficient(text_1: &str, text_2: &str) -> f64 {
    if text_1.is_empty() || text_2.is_empty() {
        return 0.0;
    }
    let grams_1 = char_ngrams(text_1, NGRAM_SIZE);
    let grams_2 = char_ngrams(text_2, NGRAM_SIZE);

    let overlap: usize = grams_1
        .iter()
        .filter_map(|(gram, &count)| grams_2.get(gram).map(|&other| count.min(other)))
        .sum();
    let total: usize = grams_1.values().sum::<usize>() + grams_2.values().sum::<usize>();

    if total == 0 {
        0.0
    } else {
        2.0 * overlap as f64 / total as f64
    }
}

/// `|A∩B| / |A∪B|`; 0.0 when either set is empty.
pub fn jaccard<T: Eq + Hash>(set_1: &HashSet<T>, set_2: &HashSet<T>) -> f64 {
    if set_1.is_empty() || set_2.is_empty() {
        return 0.0;
    }
    let intersection = set_1.intersection(set_2).count();
    let union = set_1.len() + set_2.len() - intersection;
    intersection as f64 / union as f64
}

/// Jaccard over whitespace-separated word sets.
pub fn word_jaccard(text_1: &str, text_2: &str) -> f64 {
    let words_1: HashSet<&str> = text_1.split_whitespace().collect();
    let words_2: HashSet<&str> = text_2.split_whitespace().collect();
    jaccard(&words_1, &words_2)
}

/// Jaccard over adjacent word pairs of the lowercased texts.
///
/// Falls back to unigram Jaccard when either text has fewer than two words.
pub fn bigram_jaccard(text_1: &str, text_2: &str) -> f64 {
    let lower_1 = text_1.to_lowercase();
    let lower_2 = text_2.to_lowercase();
    let words_1: Vec<&str> = lower_1.split_whitespace().collect();
    let words_2: Vec<&str> = lower_2.split_whitespace().collect();

    if words_1.len() < 2 || words_2.len() < 2 {
        let set_1: HashSet<&str> = words_1.into_iter().collect();
        let set_2: HashSet<&str> = words_2.into_iter().collect();
        return jaccard(&set_1, &set_2);
    }

    let pairs_1: HashSet<(&str, &str)> = words_1.windows(2).map(|w| (w[0], w[1])).collect();
    let pairs_2: HashSet<(&str, &str)> = words_2.windows(2).map(|w| (w[0], w[1])).collect();
    jaccard(&pairs_1, &pairs_2)
}
