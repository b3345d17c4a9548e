//! The decision engine: normalize, vectorize, classify, override.
//!
//! # Examples
//!
//! ```
//! use polarity::ml::artifacts::TrainedArtifacts;
//! use polarity::ml::classifier::ClassifierConfig;
//! use polarity::ml::label::Label;
//! use polarity::ml::vectorizer::{TfIdfVectorizer, VectorizerConfig};
//! use polarity::sentiment::DecisionEngine;
//!
//! let docs = ["sound quality good", "stopped working day", "okay nothing special"];
//! let labels = [Label::Positive, Label::Negative, Label::Neutral];
//!
//! let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default());
//! let features = vectorizer.fit_transform(&docs).unwrap();
//! let model = ClassifierConfig::default().fit(&features, &labels).unwrap();
//! let engine = DecisionEngine::new(TrainedArtifacts::from_model(vectorizer, model).unwrap());
//!
//! assert_eq!(engine.classify("The item was broken and cheap").unwrap(), Label::Negative);
//! assert!(engine.classify("   ").is_err());
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::{NormalizedText, Normalizer};
use crate::analysis::tokenizer::whitespace::is_whitespace;
use crate::error::{PolarityError, Result};
use crate::ml::artifacts::TrainedArtifacts;
use crate::ml::classifier::LabelScores;
use crate::ml::label::Label;
use crate::sentiment::override_engine::OverrideEngine;
use crate::sentiment::rules::RuleSet;

/// Message of the error returned for empty reviews.
pub const EMPTY_REVIEW_MESSAGE: &str = "Empty review text";

/// Full trace of one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Final label.
    pub label: Label,
    /// Label chosen by the classifier before overrides.
    pub classifier_label: Label,
    /// Classifier decision scores, in label order.
    pub scores: LabelScores,
    /// The review after normalization.
    pub normalized: NormalizedText,
    /// Override rules that fired, in evaluation order.
    pub fired_rules: Vec<String>,
}

/// Classifies raw reviews.
///
/// Read-only after construction and safe to share between threads.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    normalizer: Normalizer,
    artifacts: TrainedArtifacts,
    overrides: OverrideEngine,
}

impl DecisionEngine {
    /// Engine with the review normalizer and the default override rules.
    pub fn new(artifacts: TrainedArtifacts) -> Self {
        DecisionEngine {
            normalizer: Normalizer::new(),
            artifacts,
            overrides: OverrideEngine::default(),
        }
    }

    /// Replace the normalizer. It must match the one used for training.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Replace the override rules.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.overrides = OverrideEngine::new(rules);
        self
    }

    pub fn artifacts(&self) -> &TrainedArtifacts {
        &self.artifacts
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn rules(&self) -> &RuleSet {
        self.overrides.rules()
    }

    /// Classify one review.
    pub fn classify(&self, raw: &str) -> Result<Label> {
        self.classify_detailed(raw).map(|d| d.label)
    }

    /// Classify one review, keeping the intermediate results.
    pub fn classify_detailed(&self, raw: &str) -> Result<Decision> {
        if raw.chars().all(is_whitespace) {
            return Err(PolarityError::invalid_input(EMPTY_REVIEW_MESSAGE));
        }

        let normalized = self.normalizer.normalize(raw)?;
        let features = self.artifacts.transform(normalized.as_str())?;
        let classifier = self.artifacts.classifier();
        let scores = classifier.decision_scores(&features)?;
        let classifier_label = crate::ml::classifier::argmax_label(&scores);

        let outcome = self.overrides.apply(raw, &normalized, classifier_label);
        tracing::debug!(
            classifier = classifier.name(),
            %classifier_label,
            label = %outcome.label,
            fired = ?outcome.fired_rules,
            "classified review"
        );

        Ok(Decision {
            label: outcome.label,
            classifier_label,
            scores,
            normalized,
            fired_rules: outcome.fired_rules,
        })
    }

    /// Classify many reviews in parallel, keeping their order. Each review
    /// succeeds or fails on its own.
    pub fn classify_batch<S: AsRef<str> + Sync>(&self, reviews: &[S]) -> Vec<Result<Label>> {
        reviews
            .par_iter()
            .map(|review| self.classify(review.as_ref()))
            .collect()
    }
}
