//! Two-document TF-IDF cosine similarity.
//!
//! Terms are word unigrams and bigrams (tokens of two or more word
//! characters). Term frequency is sublinear (`1 + ln tf`), inverse document
//! frequency is smoothed (`ln((1 + n) / (1 + df)) + 1`), and each document
//! vector is L2-normalized.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Vocabulary size limit; the most frequent terms across both documents are kept.
pub const MAX_FEATURES: usize = 5000;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TfidfError {
    #[error("empty vocabulary: documents contain no terms")]
    EmptyVocabulary,
}

fn terms(document: &str) -> Vec<String> {
    let lower = document.to_lowercase();
    let tokens: Vec<&str> = TOKEN.find_iter(&lower).map(|m| m.as_str()).collect();

    let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    terms.extend(tokens.windows(2).map(|pair| pair.join(" ")));
    terms
}

fn term_counts(terms: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry(term.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Cosine similarity of the TF-IDF vectors of two documents.
///
/// Fails with [`TfidfError::EmptyVocabulary`] when neither document has a
/// term of two or more word characters.
pub fn tfidf_cosine(document_1: &str, document_2: &str) -> Result<f64, TfidfError> {
    let terms_1 = terms(document_1);
    let terms_2 = terms(document_2);
    let counts = [term_counts(&terms_1), term_counts(&terms_2)];

    // corpus frequency and document frequency per term
    let mut vocabulary: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for doc in &counts {
        for (&term, &tf) in doc {
            let entry = vocabulary.entry(term).or_insert((0, 0));
            entry.0 += tf;
            entry.1 += 1;
        }
    }
    if vocabulary.is_empty() {
        return Err(TfidfError::EmptyVocabulary);
    }

    if vocabulary.len() > MAX_FEATURES {
        let mut ranked: Vec<(&str, usize)> =
            vocabulary.iter().map(|(&term, &(cf, _))| (term, cf)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let keep: std::collections::HashSet<&str> =
            ranked.into_iter().take(MAX_FEATURES).map(|(term, _)| term).collect();
        vocabulary.retain(|term, _| keep.contains(term));
    }

    let n_docs = counts.len() as f64;
    let vectors: Vec<Vec<f64>> = counts
        .iter()
        .map(|doc| {
            let raw: Vec<f64> = vocabulary
                .iter()
                .map(|(term, &(_, df))| match doc.get(term) {
                    Some(&tf) if tf > 0 => {
                        let idf = ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0;
                        (1.0 + (tf as f64).ln()) * idf
                    }
                    _ => 0.0,
                })
                .collect();
            l2_normalized(raw)
        })
        .collect();

    Ok(cosine(&vectors[0], &vectors[1]))
}

fn l2_normalized(mut vector: Vec<f64>) -> Vec<f64> {
    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
