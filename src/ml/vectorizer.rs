//! TF-IDF vectorizer for normalized review text.
//!
//! Terms are the tokens matching `\b\w\w+\b` plus their word n-grams. The
//! vocabulary keeps the `max_features` most frequent terms of the training
//! corpus and assigns indices in alphabetical order. Weights are raw term
//! counts multiplied by the smoothed inverse document frequency
//! `ln((1 + n) / (1 + df)) + 1`, then L2-normalized.
//!
//! # Examples
//!
//! ```
//! use polarity::ml::vectorizer::{TfIdfVectorizer, VectorizerConfig};
//!
//! let corpus = ["great battery", "battery died", "great sound"];
//! let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default());
//! vectorizer.fit(&corpus).unwrap();
//!
//! let vector = vectorizer.transform("great battery life").unwrap();
//! assert_eq!(vector.dimension(), vectorizer.vocabulary_size());
//! assert!(vector.nnz() > 0);
//! ```

use std::sync::LazyLock;

use ahash::AHashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PolarityError, Result};

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Pattern selecting terms from a normalized string.
pub const TOKEN_PATTERN: &str = r"\b\w\w+\b";

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_PATTERN).expect("static token pattern"));

/// Row normalization applied to each feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Scale to unit Euclidean length.
    #[default]
    L2,
    /// Leave raw tf-idf weights.
    None,
}

/// Vectorizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Maximum number of vocabulary terms; `None` keeps every term.
    pub max_features: Option<usize>,
    /// Smallest n-gram length.
    pub min_n: usize,
    /// Largest n-gram length.
    pub max_n: usize,
    /// Row normalization.
    pub norm: Norm,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            max_features: Some(DEFAULT_MAX_FEATURES),
            min_n: 1,
            max_n: 2,
            norm: Norm::L2,
        }
    }
}

impl VectorizerConfig {
    /// Check the n-gram range and vocabulary cap.
    pub fn validate(&self) -> Result<()> {
        if self.min_n == 0 || self.min_n > self.max_n {
            return Err(PolarityError::config(format!(
                "invalid n-gram range ({}, {})",
                self.min_n, self.max_n
            )));
        }
        if self.max_features == Some(0) {
            return Err(PolarityError::config("max_features must be positive"));
        }
        Ok(())
    }
}

/// A sparse feature vector tied to the vectorizer that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    dimension: usize,
    /// `(index, value)` pairs sorted by index, no zeros.
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// An all-zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        FeatureVector {
            dimension,
            entries: Vec::new(),
        }
    }

    /// Build a vector from `(index, value)` pairs. Pairs are sorted, duplicate
    /// indices summed and zeros dropped.
    pub fn from_entries(dimension: usize, mut entries: Vec<(usize, f64)>) -> Result<Self> {
        if let Some(&(index, _)) = entries.iter().find(|(i, _)| *i >= dimension) {
            return Err(PolarityError::contract_violation(format!(
                "feature index {index} out of bounds for dimension {dimension}"
            )));
        }
        entries.sort_by_key(|(i, _)| *i);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == index => *acc += value,
                _ => merged.push((index, value)),
            }
        }
        merged.retain(|(_, v)| *v != 0.0);
        Ok(FeatureVector {
            dimension,
            entries: merged,
        })
    }

    /// Build a vector from a dense slice.
    pub fn from_dense(values: &[f64]) -> Self {
        FeatureVector {
            dimension: values.len(),
            entries: values
                .iter()
                .enumerate()
                .filter(|(_, v)| **v != 0.0)
                .map(|(i, v)| (i, *v))
                .collect(),
        }
    }

    /// Length of the vector (the vocabulary size).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Whether every component is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Non-zero entries in index order.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Value at `index` (zero when absent).
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dot product with a dense weight slice of the same dimension.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|(i, v)| weights.get(*i).copied().unwrap_or(0.0) * v)
            .sum()
    }

    /// Euclidean length.
    pub fn l2_norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    /// Dense copy of the vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dimension];
        for (i, v) in &self.entries {
            dense[*i] = *v;
        }
        dense
    }
}

/// TF-IDF vectorizer over normalized text.
#[derive(Clone, Serialize, Deserialize)]
#[serde(into = "VectorizerState", try_from = "VectorizerState")]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    /// Vocabulary terms in index (alphabetical) order.
    terms: Vec<String>,
    /// Term -> index mapping.
    vocabulary: AHashMap<String, usize>,
    /// Inverse document frequency for each term.
    idf: Vec<f64>,
    /// Number of documents seen during fit.
    n_documents: usize,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("config", &self.config)
            .field("vocabulary_size", &self.terms.len())
            .field("n_documents", &self.n_documents)
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(config: VectorizerConfig) -> Self {
        TfIdfVectorizer {
            config,
            terms: Vec::new(),
            vocabulary: AHashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
        }
    }

    /// Fit the vocabulary and idf weights on a corpus of normalized texts.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        self.config.validate()?;
        if documents.is_empty() {
            return Err(PolarityError::training("cannot fit vectorizer on an empty corpus"));
        }

        // term -> (total count, document frequency)
        let mut stats: AHashMap<String, (usize, usize)> = AHashMap::new();
        for doc in documents {
            let mut seen: AHashMap<String, usize> = AHashMap::new();
            for term in self.extract_terms(doc.as_ref()) {
                *seen.entry(term).or_insert(0) += 1;
            }
            for (term, count) in seen {
                let entry = stats.entry(term).or_insert((0, 0));
                entry.0 += count;
                entry.1 += 1;
            }
        }

        if stats.is_empty() {
            return Err(PolarityError::training(
                "empty vocabulary; documents contain no terms",
            ));
        }

        let mut ranked: Vec<(String, usize, usize)> = stats
            .into_iter()
            .map(|(term, (count, df))| (term, count, df))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(limit) = self.config.max_features {
            ranked.truncate(limit);
        }
        ranked.sort_by(|a, b| a.0.cmp(&b.0));

        let n = documents.len() as f64;
        self.idf = ranked
            .iter()
            .map(|(_, _, df)| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();
        self.terms = ranked.into_iter().map(|(term, _, _)| term).collect();
        self.vocabulary = Self::index_terms(&self.terms);
        self.n_documents = documents.len();

        tracing::debug!(
            vocabulary_size = self.terms.len(),
            n_documents = self.n_documents,
            "fitted tf-idf vectorizer"
        );

        Ok(())
    }

    /// Fit on the corpus and transform every document.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Vec<FeatureVector>> {
        self.fit(documents)?;
        documents
            .iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect()
    }

    /// Transform a normalized text into a feature vector.
    ///
    /// Terms outside the vocabulary are ignored. Calling this before the
    /// vectorizer is fitted is a contract violation.
    pub fn transform(&self, text: &str) -> Result<FeatureVector> {
        if !self.is_fitted() {
            return Err(PolarityError::contract_violation(
                "transform called on an unfitted vectorizer",
            ));
        }

        let mut counts: AHashMap<usize, f64> = AHashMap::new();
        for term in self.extract_terms(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();
        entries.sort_by_key(|(i, _)| *i);

        if self.config.norm == Norm::L2 {
            let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, v) in &mut entries {
                    *v /= norm;
                }
            }
        }

        Ok(FeatureVector {
            dimension: self.terms.len(),
            entries,
        })
    }

    /// Terms (unigrams and n-grams) extracted from a normalized text.
    pub fn extract_terms(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = TOKEN_REGEX.find_iter(text).map(|m| m.as_str()).collect();
        let mut terms = Vec::new();
        let longest = self.config.max_n.min(words.len());
        for n in self.config.min_n.max(1)..=longest {
            for window in words.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Whether `fit` has run (or a fitted state was loaded).
    pub fn is_fitted(&self) -> bool {
        !self.terms.is_empty()
    }

    /// Number of vocabulary terms, which is the feature dimension.
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Index of a vocabulary term.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Term at a vocabulary index.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Inverse document frequency at a vocabulary index.
    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }

    /// Number of documents the vectorizer was fitted on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// The vectorizer configuration.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    fn index_terms(terms: &[String]) -> AHashMap<String, usize> {
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect()
    }
}

/// Persisted form of a [`TfIdfVectorizer`].
#[derive(Serialize, Deserialize)]
struct VectorizerState {
    config: VectorizerConfig,
    terms: Vec<String>,
    idf: Vec<f64>,
    n_documents: usize,
}

impl From<TfIdfVectorizer> for VectorizerState {
    fn from(vectorizer: TfIdfVectorizer) -> Self {
        VectorizerState {
            config: vectorizer.config,
            terms: vectorizer.terms,
            idf: vectorizer.idf,
            n_documents: vectorizer.n_documents,
        }
    }
}

impl TryFrom<VectorizerState> for TfIdfVectorizer {
    type Error = PolarityError;

    fn try_from(state: VectorizerState) -> Result<Self> {
        state
            .config
            .validate()
            .map_err(|e| PolarityError::artifact_load(format!("vectorizer config: {e}")))?;
        if state.idf.iter().any(|w| !w.is_finite()) {
            return Err(PolarityError::artifact_load("vectorizer has non-finite idf weights"));
        }
        if state.terms.len() != state.idf.len() {
            return Err(PolarityError::artifact_load(format!(
                "vectorizer has {} terms but {} idf weights",
                state.terms.len(),
                state.idf.len()
            )));
        }
        let vocabulary = Self::index_terms(&state.terms);
        if vocabulary.len() != state.terms.len() {
            return Err(PolarityError::artifact_load("vectorizer vocabulary has duplicate terms"));
        }
        Ok(TfIdfVectorizer {
            config: state.config,
            terms: state.terms,
            vocabulary,
            idf: state.idf,
            n_documents: state.n_documents,
        })
    }
}
