//! Classification metrics for sentiment predictions.
//!
//! Precision, recall and F1 are zero when their denominator is zero.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PolarityError, Result};
use crate::ml::label::Label;

/// Precision, recall, F1 and support of one label (or an average).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Confusion matrix; rows are true labels, columns predicted labels, both in
/// [`Label::index`] order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix(pub [[usize; Label::COUNT]; Label::COUNT]);

impl ConfusionMatrix {
    /// Count of samples with the given true and predicted labels.
    pub fn get(&self, truth: Label, predicted: Label) -> usize {
        self.0[truth.index()][predicted.index()]
    }

    /// Samples whose true label is `label`.
    pub fn support(&self, label: Label) -> usize {
        self.0[label.index()].iter().sum()
    }

    /// Samples predicted as `label`.
    pub fn predicted(&self, label: Label) -> usize {
        self.0.iter().map(|row| row[label.index()]).sum()
    }

    /// Total number of samples.
    pub fn total(&self) -> usize {
        self.0.iter().flatten().sum()
    }
}

/// Full evaluation of a set of predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    /// Metrics per label, in [`Label::ALL`] order, for labels with support
    /// or predictions.
    pub labels: Vec<(Label, LabelMetrics)>,
    pub macro_avg: LabelMetrics,
    pub weighted_avg: LabelMetrics,
    pub confusion_matrix: ConfusionMatrix,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl ClassificationReport {
    /// Compare true labels with predictions.
    pub fn new(truth: &[Label], predicted: &[Label]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(PolarityError::training(format!(
                "{} true labels but {} predictions",
                truth.len(),
                predicted.len()
            )));
        }
        if truth.is_empty() {
            return Err(PolarityError::training("cannot evaluate an empty prediction set"));
        }

        let mut matrix = ConfusionMatrix::default();
        for (t, p) in truth.iter().zip(predicted) {
            matrix.0[t.index()][p.index()] += 1;
        }

        let correct: usize = Label::ALL.iter().map(|l| matrix.get(*l, *l)).sum();
        let total = truth.len();

        let labels: Vec<(Label, LabelMetrics)> = Label::ALL
            .iter()
            .filter(|l| matrix.support(**l) > 0 || matrix.predicted(**l) > 0)
            .map(|&label| {
                let tp = matrix.get(label, label);
                let precision = ratio(tp, matrix.predicted(label));
                let recall = ratio(tp, matrix.support(label));
                (
                    label,
                    LabelMetrics {
                        precision,
                        recall,
                        f1: f1(precision, recall),
                        support: matrix.support(label),
                    },
                )
            })
            .collect();

        let n_labels = labels.len() as f64;
        let mut macro_avg = LabelMetrics {
            support: total,
            ..Default::default()
        };
        let mut weighted_avg = macro_avg;
        for (_, m) in &labels {
            macro_avg.precision += m.precision / n_labels;
            macro_avg.recall += m.recall / n_labels;
            macro_avg.f1 += m.f1 / n_labels;

            let weight = m.support as f64 / total as f64;
            weighted_avg.precision += m.precision * weight;
            weighted_avg.recall += m.recall * weight;
            weighted_avg.f1 += m.f1 * weight;
        }

        Ok(ClassificationReport {
            accuracy: ratio(correct, total),
            labels,
            macro_avg,
            weighted_avg,
            confusion_matrix: matrix,
        })
    }

    /// Metrics of one label, if it appeared.
    pub fn label(&self, label: Label) -> Option<&LabelMetrics> {
        self.labels.iter().find(|(l, _)| *l == label).map(|(_, m)| m)
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for (label, m) in &self.labels {
            writeln!(
                f,
                "{:>14} {:>10.4} {:>10.4} {:>10.4} {:>10}",
                label.as_str(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10.4} {:>10}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.confusion_matrix.total()
        )?;
        for (name, m) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>14} {:>10.4} {:>10.4} {:>10.4} {:>10}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "confusion matrix (rows = true, cols = predicted):")?;
        for row in &self.confusion_matrix.0 {
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>6}")).collect();
            writeln!(f, "  {}", cells.join(""))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Label::*;

    #[test]
    fn test_report() {
        let truth = [Positive, Positive, Negative, Negative, Neutral];
        let predicted = [Positive, Negative, Negative, Negative, Positive];
        let report = ClassificationReport::new(&truth, &predicted).unwrap();

        assert!((report.accuracy - 0.6).abs() < 1e-12);
        assert_eq!(report.confusion_matrix.get(Positive, Negative), 1);
        assert_eq!(report.confusion_matrix.get(Neutral, Positive), 1);

        let neg = report.label(Negative).unwrap();
        assert!((neg.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((neg.recall - 1.0).abs() < 1e-12);
        assert_eq!(neg.support, 2);

        let neu = report.label(Neutral).unwrap();
        assert_eq!(neu.precision, 0.0);
        assert_eq!(neu.f1, 0.0);

        assert_eq!(report.macro_avg.support, 5);
        assert!(report.weighted_avg.f1 > 0.0);
        assert!(report.to_string().contains("weighted avg"));
    }

    #[test]
    fn test_absent_labels_skipped() {
        let report = ClassificationReport::new(&[Positive, Negative], &[Positive, Negative]).unwrap();
        assert_eq!(report.labels.len(), 2);
        assert!(report.label(Neutral).is_none());
        assert_eq!(report.macro_avg.f1, 1.0);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            ClassificationReport::new(&[], &[]),
            Err(PolarityError::Training(_))
        ));
        assert!(matches!(
            ClassificationReport::new(&[Positive], &[]),
            Err(PolarityError::Training(_))
        ));
    }
}
