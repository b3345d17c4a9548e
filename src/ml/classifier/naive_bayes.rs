//! Multinomial naive Bayes over tf-idf weights.

use serde::{Deserialize, Serialize};

use super::{
    Classifier, LabelScores, check_dimension, check_label_rows, check_row_len, check_training_set,
};
use crate::error::{PolarityError, Result};
use crate::ml::label::Label;
use crate::ml::vectorizer::FeatureVector;

/// Hyperparameters for [`MultinomialNaiveBayes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesParams {
    /// Additive (Laplace/Lidstone) smoothing.
    pub alpha: f64,
}

impl Default for NaiveBayesParams {
    fn default() -> Self {
        NaiveBayesParams { alpha: 1.0 }
    }
}

/// Multinomial naive Bayes classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    /// `ln P(label)`; negative infinity for labels absent from training.
    class_log_prior: Vec<f64>,
    /// `ln P(feature | label)` rows indexed by label.
    feature_log_prob: Vec<Vec<f64>>,
    dimension: usize,
}

impl MultinomialNaiveBayes {
    /// Estimate priors and smoothed feature likelihoods.
    pub fn fit(params: &NaiveBayesParams, features: &[FeatureVector], labels: &[Label]) -> Result<Self> {
        if !(params.alpha > 0.0 && params.alpha.is_finite()) {
            return Err(PolarityError::config(format!(
                "alpha must be positive, got {}",
                params.alpha
            )));
        }
        let (dimension, counts) = check_training_set(features, labels)?;
        if features
            .iter()
            .any(|v| v.entries().iter().any(|(_, value)| *value < 0.0))
        {
            return Err(PolarityError::training("naive Bayes requires non-negative features"));
        }

        let mut feature_totals = vec![vec![0.0; dimension]; Label::COUNT];
        for (v, label) in features.iter().zip(labels) {
            let row = &mut feature_totals[label.index()];
            for (j, value) in v.entries() {
                row[*j] += value;
            }
        }

        let n = features.len() as f64;
        let class_log_prior = counts
            .iter()
            .map(|c| if *c > 0 { (*c as f64 / n).ln() } else { f64::NEG_INFINITY })
            .collect();

        let feature_log_prob = feature_totals
            .into_iter()
            .map(|row| {
                let total: f64 = row.iter().sum::<f64>() + params.alpha * dimension as f64;
                row.into_iter()
                    .map(|value| ((value + params.alpha) / total).ln())
                    .collect()
            })
            .collect();

        Ok(MultinomialNaiveBayes {
            class_log_prior,
            feature_log_prob,
            dimension,
        })
    }

    /// Log prior of a label.
    pub fn log_prior(&self, label: Label) -> f64 {
        self.class_log_prior[label.index()]
    }
}

impl Classifier for MultinomialNaiveBayes {
    fn decision_scores(&self, features: &FeatureVector) -> Result<LabelScores> {
        check_dimension(self.dimension, features)?;
        let mut scores = [f64::NEG_INFINITY; Label::COUNT];
        for (k, score) in scores.iter_mut().enumerate() {
            let prior = self.class_log_prior[k];
            if prior.is_finite() {
                *score = prior + features.dot(&self.feature_log_prob[k]);
            }
        }
        Ok(scores)
    }

    fn input_dimension(&self) -> usize {
        self.dimension
    }

    fn validate(&self) -> Result<()> {
        let name = self.name();
        check_label_rows(name, "log prior", self.class_log_prior.len())?;
        check_label_rows(name, "feature row", self.feature_log_prob.len())?;
        for label in Label::ALL {
            check_row_len(name, label, self.feature_log_prob[label.index()].len(), self.dimension)?;
        }
        if !self.class_log_prior.iter().any(|p| p.is_finite()) {
            return Err(PolarityError::artifact_load(format!("{name} has no trained labels")));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "naive_bayes"
    }
}
