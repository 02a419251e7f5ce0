//! Bag-of-n-grams text featurization.
//!
//! A [`TextFeaturizer`] is fit on the training texts of one iteration and
//! yields a [`FittedTransform`]. The fitted transform is immutable: test
//! evaluation and live prediction both reuse it so every vector lives in the
//! feature space the classifier was trained on.
//!
//! Each text is lowercased and split into words (maximal alphanumeric runs).
//! Features are word n-grams up to `word_ngrams` and character n-grams of
//! length `char_ngrams` taken over each word wrapped in `<`/`>` markers.
//! Vectors hold term counts scaled to unit L2 norm and store only their
//! non-zero entries, so a row costs the number of grams in its text no
//! matter how large the vocabulary grows.

use crate::error::{MailsieveError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const WORD_PREFIX: &str = "w:";
const CHAR_PREFIX: &str = "c:";

/// Sparse feature row: `(index, value)` pairs sorted by index, no zeros.
/// Indices that are not stored read as `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build from arbitrary pairs. Zero values are dropped and duplicate
    /// indices are summed.
    pub fn from_entries<I: IntoIterator<Item = (usize, f64)>>(entries: I) -> Self {
        let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
        for (index, value) in entries {
            *merged.entry(index).or_insert(0.0) += value;
        }
        Self {
            entries: merged.into_iter().filter(|&(_, v)| v != 0.0).collect(),
        }
    }

    pub fn from_dense(values: &[f64]) -> Self {
        Self::from_entries(values.iter().copied().enumerate())
    }

    /// Value at `index`, found by binary search.
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturizerOptions {
    /// Longest word n-gram (1 = unigrams only)
    pub word_ngrams: usize,
    /// Character n-gram length (0 disables character grams)
    pub char_ngrams: usize,
}

impl Default for FeaturizerOptions {
    fn default() -> Self {
        Self {
            word_ngrams: 2,
            char_ngrams: 3,
        }
    }
}

impl FeaturizerOptions {
    pub fn validate(&self) -> Result<()> {
        if self.word_ngrams == 0 {
            return Err(MailsieveError::Config(
                "word_ngrams must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextFeaturizer {
    options: FeaturizerOptions,
}

impl TextFeaturizer {
    pub fn new(options: FeaturizerOptions) -> Self {
        Self { options }
    }

    /// Build the vocabulary from `texts` and featurize each of them.
    ///
    /// Vocabulary indices follow first appearance in `texts`, so the same
    /// ordered corpus always yields the same transform.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        texts: &[S],
    ) -> (FittedTransform, Vec<FeatureVector>) {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut terms = Vec::new();

        for text in texts {
            for gram in extract_grams(text.as_ref(), &self.options) {
                if !vocabulary.contains_key(&gram) {
                    vocabulary.insert(gram.clone(), terms.len());
                    terms.push(gram);
                }
            }
        }

        let transform = FittedTransform {
            options: self.options,
            vocabulary,
            terms,
        };
        let features = texts.iter().map(|t| transform.transform(t.as_ref())).collect();

        log::debug!("Fitted vocabulary of {} terms", transform.dimension());
        (transform, features)
    }
}

/// Vocabulary learned by [`TextFeaturizer::fit_transform`].
#[derive(Debug, Clone)]
pub struct FittedTransform {
    options: FeaturizerOptions,
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
}

impl FittedTransform {
    /// Featurize a single text. Grams outside the vocabulary are dropped.
    pub fn transform(&self, text: &str) -> FeatureVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for gram in extract_grams(text, &self.options) {
            if let Some(&idx) = self.vocabulary.get(&gram) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let norm = counts.values().map(|v| v * v).sum::<f64>().sqrt();
        FeatureVector {
            entries: counts.into_iter().map(|(idx, count)| (idx, count / norm)).collect(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.terms.len()
    }

    /// The gram behind a feature index, e.g. `w:invoice` or `c:<in`.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn extract_grams(text: &str, options: &FeaturizerOptions) -> Vec<String> {
    let words = tokenize(text);
    let mut grams = Vec::new();

    for n in 1..=options.word_ngrams {
        for window in words.windows(n) {
            grams.push(format!("{}{}", WORD_PREFIX, window.join(" ")));
        }
    }

    if options.char_ngrams > 0 {
        for word in &words {
            let wrapped: Vec<char> = format!("<{}>", word).chars().collect();
            for window in wrapped.windows(options.char_ngrams) {
                grams.push(format!("{}{}", CHAR_PREFIX, window.iter().collect::<String>()));
            }
        }
    }

    grams
}
