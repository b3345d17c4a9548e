//! One-vs-rest logistic regression trained with batch gradient descent.

use serde::{Deserialize, Serialize};

use super::{
    Classifier, LabelScores, check_dimension, check_label_rows, check_row_len, check_training_set,
};
use crate::error::{PolarityError, Result};
use crate::ml::label::Label;
use crate::ml::vectorizer::FeatureVector;

/// Hyperparameters for [`LogisticRegression`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticRegressionParams {
    /// Inverse regularization strength; smaller values regularize more.
    pub c: f64,
    /// Maximum number of gradient descent iterations per label.
    pub max_iter: usize,
    /// Step size upper bound.
    pub learning_rate: f64,
    /// Stop once the gradient norm falls below this value.
    pub tolerance: f64,
}

impl Default for LogisticRegressionParams {
    fn default() -> Self {
        LogisticRegressionParams {
            c: 1.0,
            max_iter: 500,
            learning_rate: 1.0,
            tolerance: 1e-5,
        }
    }
}

impl LogisticRegressionParams {
    fn validate(&self) -> Result<()> {
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(PolarityError::config(format!("c must be positive, got {}", self.c)));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(PolarityError::config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_iter == 0 {
            return Err(PolarityError::config("max_iter must be at least 1"));
        }
        Ok(())
    }
}

/// L2-regularized one-vs-rest logistic regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Weight rows indexed by label.
    weights: Vec<Vec<f64>>,
    /// Intercepts indexed by label.
    intercepts: Vec<f64>,
    /// Labels seen during training; unseen labels are never predicted.
    seen: [bool; Label::COUNT],
    dimension: usize,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    /// Train one binary model per label on the given vectors.
    pub fn fit(
        params: &LogisticRegressionParams,
        features: &[FeatureVector],
        labels: &[Label],
    ) -> Result<Self> {
        params.validate()?;
        let (dimension, counts) = check_training_set(features, labels)?;
        let n = features.len() as f64;

        // Step size bounded by the inverse Lipschitz constant of the gradient.
        let max_sq_norm = features
            .iter()
            .map(|v| v.l2_norm().powi(2))
            .fold(0.0, f64::max);
        let lipschitz = 0.25 * (max_sq_norm + 1.0) + 1.0 / (params.c * n);
        let step = params.learning_rate.min(1.0 / lipschitz);

        let mut weights = vec![vec![0.0; dimension]; Label::COUNT];
        let mut intercepts = vec![0.0; Label::COUNT];
        let mut seen = [false; Label::COUNT];

        for label in Label::ALL {
            let k = label.index();
            seen[k] = counts[k] > 0;
            if !seen[k] {
                continue;
            }

            let targets: Vec<f64> = labels
                .iter()
                .map(|l| if *l == label { 1.0 } else { 0.0 })
                .collect();
            let w = &mut weights[k];
            let mut b = 0.0;
            let mut grad = vec![0.0; dimension];

            for iteration in 0..params.max_iter {
                grad.iter_mut().for_each(|g| *g = 0.0);
                let mut grad_b = 0.0;

                for (x, y) in features.iter().zip(&targets) {
                    let error = sigmoid(x.dot(w) + b) - y;
                    for (j, value) in x.entries() {
                        grad[*j] += error * value;
                    }
                    grad_b += error;
                }

                let mut norm_sq = 0.0;
                for (g, wj) in grad.iter_mut().zip(w.iter()) {
                    *g = *g / n + wj / (params.c * n);
                    norm_sq += *g * *g;
                }
                grad_b /= n;
                norm_sq += grad_b * grad_b;

                for (wj, g) in w.iter_mut().zip(&grad) {
                    *wj -= step * g;
                }
                b -= step * grad_b;

                if norm_sq.sqrt() < params.tolerance {
                    tracing::debug!(label = %label, iteration, "logistic regression converged");
                    break;
                }
            }
            intercepts[k] = b;
        }

        Ok(LogisticRegression {
            weights,
            intercepts,
            seen,
            dimension,
        })
    }

    /// Weight row and intercept for a label.
    pub fn coefficients(&self, label: Label) -> (&[f64], f64) {
        (&self.weights[label.index()], self.intercepts[label.index()])
    }
}

impl Classifier for LogisticRegression {
    fn decision_scores(&self, features: &FeatureVector) -> Result<LabelScores> {
        check_dimension(self.dimension, features)?;
        let mut scores = [f64::NEG_INFINITY; Label::COUNT];
        for k in 0..Label::COUNT {
            if self.seen[k] {
                scores[k] = features.dot(&self.weights[k]) + self.intercepts[k];
            }
        }
        Ok(scores)
    }

    fn input_dimension(&self) -> usize {
        self.dimension
    }

    fn validate(&self) -> Result<()> {
        let name = self.name();
        check_label_rows(name, "weight row", self.weights.len())?;
        check_label_rows(name, "intercept", self.intercepts.len())?;
        for label in Label::ALL {
            check_row_len(name, label, self.weights[label.index()].len(), self.dimension)?;
        }
        if !self.seen.iter().any(|seen| *seen) {
            return Err(PolarityError::artifact_load(format!("{name} has no trained labels")));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> (Vec<FeatureVector>, Vec<Label>) {
        (
            vec![
                FeatureVector::from_dense(&[1.0, 0.0]),
                FeatureVector::from_dense(&[0.8, 0.2]),
                FeatureVector::from_dense(&[0.0, 1.0]),
                FeatureVector::from_dense(&[0.2, 0.8]),
            ],
            vec![Label::Positive, Label::Positive, Label::Negative, Label::Negative],
        )
    }

    #[test]
    fn test_separates_toy_data() {
        let (features, labels) = toy();
        let model =
            LogisticRegression::fit(&LogisticRegressionParams::default(), &features, &labels)
                .unwrap();
        for (v, label) in features.iter().zip(&labels) {
            assert_eq!(model.predict(v).unwrap(), *label);
        }
        let (w, _) = model.coefficients(Label::Positive);
        assert!(w[0] > w[1]);
    }

    #[test]
    fn test_unseen_label_never_predicted() {
        let (features, labels) = toy();
        let model =
            LogisticRegression::fit(&LogisticRegressionParams::default(), &features, &labels)
                .unwrap();
        let scores = model.decision_scores(&FeatureVector::zeros(2)).unwrap();
        assert_eq!(scores[Label::Neutral.index()], f64::NEG_INFINITY);
        assert_ne!(model.predict(&FeatureVector::zeros(2)).unwrap(), Label::Neutral);
    }

    #[test]
    fn test_deterministic() {
        let (features, labels) = toy();
        let params = LogisticRegressionParams::default();
        let a = LogisticRegression::fit(&params, &features, &labels).unwrap();
        let b = LogisticRegression::fit(&params, &features, &labels).unwrap();
        assert_eq!(a.coefficients(Label::Negative), b.coefficients(Label::Negative));
    }

    #[test]
    fn test_invalid_params() {
        let (features, labels) = toy();
        let params = LogisticRegressionParams {
            c: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            LogisticRegression::fit(&params, &features, &labels),
            Err(PolarityError::Config(_))
        ));
    }

    #[test]
    fn test_stable_with_strong_regularization() {
        let (features, labels) = toy();
        let params = LogisticRegressionParams {
            c: 0.001,
            learning_rate: 100.0,
            ..Default::default()
        };
        let model = LogisticRegression::fit(&params, &features, &labels).unwrap();
        let (w, b) = model.coefficients(Label::Positive);
        assert!(w.iter().all(|x| x.is_finite()));
        assert!(b.is_finite());
    }
}
