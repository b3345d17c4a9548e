//! Sentiment classifiers over tf-idf feature vectors.
//!
//! Every classifier implements [`Classifier`]. The built-in families are
//! wrapped by [`ClassifierModel`] so a trained model can be persisted and
//! loaded without knowing its concrete type. Custom classifiers can be used
//! through `Arc<dyn Classifier>`.
//!
//! # Examples
//!
//! ```
//! use polarity::ml::classifier::{Classifier, ClassifierConfig};
//! use polarity::ml::label::Label;
//! use polarity::ml::vectorizer::FeatureVector;
//!
//! let features = vec![
//!     FeatureVector::from_dense(&[1.0, 0.0]),
//!     FeatureVector::from_dense(&[0.0, 1.0]),
//! ];
//! let labels = vec![Label::Positive, Label::Negative];
//!
//! let model = ClassifierConfig::default().fit(&features, &labels).unwrap();
//! let label = model.predict(&FeatureVector::from_dense(&[0.9, 0.1])).unwrap();
//! assert_eq!(label, Label::Positive);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PolarityError, Result};
use crate::ml::label::Label;
use crate::ml::vectorizer::FeatureVector;

pub mod centroid;
pub mod logistic;
pub mod naive_bayes;

pub use centroid::NearestCentroid;
pub use logistic::{LogisticRegression, LogisticRegressionParams};
pub use naive_bayes::{MultinomialNaiveBayes, NaiveBayesParams};

/// One score per label, indexed by [`Label::index`].
pub type LabelScores = [f64; Label::COUNT];

/// Trait for trained sentiment classifiers.
pub trait Classifier: Send + Sync {
    /// Per-label decision scores; higher means more likely.
    fn decision_scores(&self, features: &FeatureVector) -> Result<LabelScores>;

    /// Predict the label of a feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        Ok(argmax_label(&self.decision_scores(features)?))
    }

    /// Dimension of the feature vectors this classifier accepts.
    fn input_dimension(&self) -> usize;

    /// Check the internal shape of a loaded model before it serves.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}

/// Label with the highest score; the lowest index wins ties.
pub fn argmax_label(scores: &LabelScores) -> Label {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = i;
        }
    }
    Label::ALL[best]
}

/// Reject vectors whose dimension differs from the classifier's input.
pub(crate) fn check_dimension(expected: usize, features: &FeatureVector) -> Result<()> {
    if features.dimension() != expected {
        return Err(PolarityError::contract_violation(format!(
            "feature vector has dimension {} but the classifier expects {}",
            features.dimension(),
            expected
        )));
    }
    Ok(())
}

/// Reject a model table that does not hold exactly one entry per label.
pub(crate) fn check_label_rows(model: &str, table: &str, len: usize) -> Result<()> {
    if len != Label::COUNT {
        return Err(PolarityError::artifact_load(format!(
            "{model} has {len} {table} entries, expected {}",
            Label::COUNT
        )));
    }
    Ok(())
}

/// Reject a weight row whose length differs from the input dimension.
pub(crate) fn check_row_len(model: &str, label: Label, len: usize, dimension: usize) -> Result<()> {
    if len != dimension {
        return Err(PolarityError::artifact_load(format!(
            "{model} row for {label} has {len} weights, expected {dimension}"
        )));
    }
    Ok(())
}

/// Validate a training set and return its dimension and per-label counts.
pub(crate) fn check_training_set(
    features: &[FeatureVector],
    labels: &[Label],
) -> Result<(usize, [usize; Label::COUNT])> {
    if features.is_empty() {
        return Err(PolarityError::training("training set is empty"));
    }
    if features.len() != labels.len() {
        return Err(PolarityError::training(format!(
            "{} feature vectors but {} labels",
            features.len(),
            labels.len()
        )));
    }
    let dimension = features[0].dimension();
    if dimension == 0 {
        return Err(PolarityError::training("feature dimension is zero"));
    }
    if let Some(v) = features.iter().find(|v| v.dimension() != dimension) {
        return Err(PolarityError::training(format!(
            "mixed feature dimensions {} and {}",
            dimension,
            v.dimension()
        )));
    }

    let mut counts = [0usize; Label::COUNT];
    for label in labels {
        counts[label.index()] += 1;
    }
    if counts.iter().filter(|c| **c > 0).count() < 2 {
        return Err(PolarityError::training(
            "training set must contain at least two distinct labels",
        ));
    }
    Ok((dimension, counts))
}

/// Classifier families that can be trained and persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    #[default]
    LogisticRegression,
    NaiveBayes,
    NearestCentroid,
}

impl ClassifierKind {
    /// Training configuration with default hyperparameters for this family.
    pub fn default_config(self) -> ClassifierConfig {
        match self {
            ClassifierKind::LogisticRegression => {
                ClassifierConfig::LogisticRegression(LogisticRegressionParams::default())
            }
            ClassifierKind::NaiveBayes => ClassifierConfig::NaiveBayes(NaiveBayesParams::default()),
            ClassifierKind::NearestCentroid => ClassifierConfig::NearestCentroid,
        }
    }

    /// Snake-case name of the family.
    pub fn as_str(self) -> &'static str {
        match self {
            ClassifierKind::LogisticRegression => "logistic_regression",
            ClassifierKind::NaiveBayes => "naive_bayes",
            ClassifierKind::NearestCentroid => "nearest_centroid",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassifierKind {
    type Err = PolarityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "logistic_regression" | "logistic" | "lr" => Ok(ClassifierKind::LogisticRegression),
            "naive_bayes" | "nb" => Ok(ClassifierKind::NaiveBayes),
            "nearest_centroid" | "centroid" => Ok(ClassifierKind::NearestCentroid),
            other => Err(PolarityError::config(format!("unknown classifier: {other:?}"))),
        }
    }
}

/// Classifier family plus its hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierConfig {
    LogisticRegression(LogisticRegressionParams),
    NaiveBayes(NaiveBayesParams),
    NearestCentroid,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierKind::default().default_config()
    }
}

impl ClassifierConfig {
    /// The classifier family.
    pub fn kind(&self) -> ClassifierKind {
        match self {
            ClassifierConfig::LogisticRegression(_) => ClassifierKind::LogisticRegression,
            ClassifierConfig::NaiveBayes(_) => ClassifierKind::NaiveBayes,
            ClassifierConfig::NearestCentroid => ClassifierKind::NearestCentroid,
        }
    }

    /// Train a classifier of this family.
    pub fn fit(&self, features: &[FeatureVector], labels: &[Label]) -> Result<ClassifierModel> {
        let model = match self {
            ClassifierConfig::LogisticRegression(params) => {
                ClassifierModel::LogisticRegression(LogisticRegression::fit(params, features, labels)?)
            }
            ClassifierConfig::NaiveBayes(params) => {
                ClassifierModel::NaiveBayes(MultinomialNaiveBayes::fit(params, features, labels)?)
            }
            ClassifierConfig::NearestCentroid => {
                ClassifierModel::NearestCentroid(NearestCentroid::fit(features, labels)?)
            }
        };
        tracing::info!(
            classifier = model.name(),
            samples = features.len(),
            dimension = model.input_dimension(),
            "trained classifier"
        );
        Ok(model)
    }
}

/// A trained model of one of the built-in families.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClassifierModel {
    LogisticRegression(LogisticRegression),
    NaiveBayes(MultinomialNaiveBayes),
    NearestCentroid(NearestCentroid),
}

impl ClassifierModel {
    /// The model's family.
    pub fn kind(&self) -> ClassifierKind {
        match self {
            ClassifierModel::LogisticRegression(_) => ClassifierKind::LogisticRegression,
            ClassifierModel::NaiveBayes(_) => ClassifierKind::NaiveBayes,
            ClassifierModel::NearestCentroid(_) => ClassifierKind::NearestCentroid,
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            ClassifierModel::LogisticRegression(model) => model,
            ClassifierModel::NaiveBayes(model) => model,
            ClassifierModel::NearestCentroid(model) => model,
        }
    }
}

impl Classifier for ClassifierModel {
    fn decision_scores(&self, features: &FeatureVector) -> Result<LabelScores> {
        self.inner().decision_scores(features)
    }

    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        self.inner().predict(features)
    }

    fn input_dimension(&self) -> usize {
        self.inner().input_dimension()
    }

    fn validate(&self) -> Result<()> {
        self.inner().validate()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }
}
