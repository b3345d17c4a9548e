//! Nearest-centroid classifier using cosine similarity.
//!
//! Each label is represented by the mean of its training vectors. A query is
//! assigned to the label whose centroid is most similar. An all-zero query
//! has no direction, so the label frequencies from training are used as
//! scores and the majority label wins.

use serde::{Deserialize, Serialize};

use super::{
    Classifier, LabelScores, check_dimension, check_label_rows, check_row_len, check_training_set,
};
use crate::error::{PolarityError, Result};
use crate::ml::label::Label;
use crate::ml::vectorizer::FeatureVector;

/// Cosine nearest-centroid classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestCentroid {
    /// Mean vector per label; empty for labels absent from training.
    centroids: Vec<Vec<f64>>,
    /// Euclidean norm of each centroid.
    centroid_norms: Vec<f64>,
    /// Fraction of training samples per label.
    priors: Vec<f64>,
    dimension: usize,
}

impl NearestCentroid {
    /// Compute the per-label centroids.
    pub fn fit(features: &[FeatureVector], labels: &[Label]) -> Result<Self> {
        let (dimension, counts) = check_training_set(features, labels)?;

        let mut sums = vec![vec![0.0; dimension]; Label::COUNT];
        for (v, label) in features.iter().zip(labels) {
            let row = &mut sums[label.index()];
            for (j, value) in v.entries() {
                row[*j] += value;
            }
        }

        let centroids: Vec<Vec<f64>> = sums
            .into_iter()
            .zip(counts)
            .map(|(row, count)| {
                if count == 0 {
                    Vec::new()
                } else {
                    row.into_iter().map(|value| value / count as f64).collect()
                }
            })
            .collect();
        let centroid_norms = centroids
            .iter()
            .map(|c| c.iter().map(|x| x * x).sum::<f64>().sqrt())
            .collect();
        let n = features.len() as f64;
        let priors = counts.iter().map(|c| *c as f64 / n).collect();

        Ok(NearestCentroid {
            centroids,
            centroid_norms,
            priors,
            dimension,
        })
    }

    /// Centroid of a label, if it was present in training.
    pub fn centroid(&self, label: Label) -> Option<&[f64]> {
        let c = &self.centroids[label.index()];
        (!c.is_empty()).then_some(c.as_slice())
    }
}

impl Classifier for NearestCentroid {
    fn decision_scores(&self, features: &FeatureVector) -> Result<LabelScores> {
        check_dimension(self.dimension, features)?;
        let mut scores = [f64::NEG_INFINITY; Label::COUNT];
        let query_norm = features.l2_norm();

        for (k, score) in scores.iter_mut().enumerate() {
            if self.centroids[k].is_empty() {
                continue;
            }
            *score = if query_norm == 0.0 {
                self.priors[k]
            } else if self.centroid_norms[k] == 0.0 {
                0.0
            } else {
                features.dot(&self.centroids[k]) / (query_norm * self.centroid_norms[k])
            };
        }
        Ok(scores)
    }

    fn input_dimension(&self) -> usize {
        self.dimension
    }

    fn validate(&self) -> Result<()> {
        let name = self.name();
        check_label_rows(name, "centroid", self.centroids.len())?;
        check_label_rows(name, "centroid norm", self.centroid_norms.len())?;
        check_label_rows(name, "prior", self.priors.len())?;
        let mut trained = 0;
        for label in Label::ALL {
            let centroid = &self.centroids[label.index()];
            if !centroid.is_empty() {
                check_row_len(name, label, centroid.len(), self.dimension)?;
                trained += 1;
            }
        }
        if trained == 0 {
            return Err(PolarityError::artifact_load(format!("{name} has no trained labels")));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "nearest_centroid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_centroid() {
        let features = vec![
            FeatureVector::from_dense(&[1.0, 0.0]),
            FeatureVector::from_dense(&[0.8, 0.2]),
            FeatureVector::from_dense(&[0.0, 1.0]),
        ];
        let labels = vec![Label::Positive, Label::Positive, Label::Negative];
        let model = NearestCentroid::fit(&features, &labels).unwrap();

        assert_eq!(model.centroid(Label::Positive), Some(&[0.9, 0.1][..]));
        assert!(model.centroid(Label::Neutral).is_none());
        assert_eq!(model.predict(&FeatureVector::from_dense(&[0.7, 0.3])).unwrap(), Label::Positive);
        assert_eq!(model.predict(&FeatureVector::from_dense(&[0.1, 0.9])).unwrap(), Label::Negative);
    }

    #[test]
    fn test_zero_vector_majority() {
        let features = vec![
            FeatureVector::from_dense(&[1.0, 0.0]),
            FeatureVector::from_dense(&[0.0, 1.0]),
            FeatureVector::from_dense(&[0.0, 0.5]),
        ];
        let labels = vec![Label::Positive, Label::Negative, Label::Negative];
        let model = NearestCentroid::fit(&features, &labels).unwrap();
        assert_eq!(model.predict(&FeatureVector::zeros(2)).unwrap(), Label::Negative);
    }
}
