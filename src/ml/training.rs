//! Offline training: dataset in, trained artifacts and a report out.
//!
//! ```text
//! Dataset → stratified split → normalize (parallel) → fit vectorizer
//!         → fit classifier → evaluate on held-out split → save
//! ```
//!
//! The vectorizer is fitted on the training split only. Normalization uses
//! the same [`Normalizer`] as serving, so the vocabulary matches what the
//! decision engine produces at inference time.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::Normalizer;
use crate::error::{PolarityError, Result};
use crate::ml::artifacts::{ArtifactPaths, TrainedArtifacts};
use crate::ml::classifier::{Classifier, ClassifierConfig, ClassifierModel};
use crate::ml::dataset::Dataset;
use crate::ml::evaluation::ClassificationReport;
use crate::ml::label::Label;
use crate::ml::vectorizer::{TfIdfVectorizer, VectorizerConfig};

/// Default share of samples held out for evaluation.
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Default split seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default directory for training reports.
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Training configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Share of each label held out for evaluation, in (0, 1).
    pub test_size: f64,
    /// Seed of the split shuffle.
    pub seed: u64,
    pub vectorizer: VectorizerConfig,
    pub classifier: ClassifierConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            test_size: DEFAULT_TEST_SIZE,
            seed: DEFAULT_SEED,
            vectorizer: VectorizerConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PolarityError::config(format!(
                "test_size must be between 0 and 1, got {}",
                self.test_size
            )));
        }
        self.vectorizer.validate()
    }
}

/// Split sample indices into (train, test), keeping label proportions.
///
/// Each label contributes `round(count * test_size)` samples to the test set,
/// capped so at least one sample of the label stays in training. Both index
/// lists are returned sorted.
pub fn stratified_split(labels: &[Label], test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();

    for label in Label::ALL {
        let mut indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == label)
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            continue;
        }
        indices.shuffle(&mut rng);

        let n_test = ((indices.len() as f64 * test_size).round() as usize).min(indices.len() - 1);
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

/// A held-out prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub text: String,
    pub truth: Label,
    pub predicted: Label,
}

/// Summary written next to the artifacts after training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// `YYYYmmdd_HHMMSS` stamp used in output file names.
    pub timestamp: String,
    pub created_at: DateTime<Utc>,
    pub classifier: ClassifierConfig,
    pub vectorizer: VectorizerConfig,
    pub train_size: usize,
    pub test_size: usize,
    pub vocabulary_size: usize,
    pub evaluation: ClassificationReport,
}

/// Everything produced by one training run.
#[derive(Debug)]
pub struct TrainingOutcome {
    pub vectorizer: TfIdfVectorizer,
    pub model: ClassifierModel,
    pub report: TrainingReport,
    pub predictions: Vec<Prediction>,
}

impl TrainingOutcome {
    /// Validated artifacts for serving, without touching the disk.
    pub fn artifacts(&self) -> Result<TrainedArtifacts> {
        TrainedArtifacts::from_model(self.vectorizer.clone(), self.model.clone())
    }

    /// Save the artifacts, then the JSON report and the held-out predictions
    /// under `reports_dir`. Returns the report path.
    pub fn save<P: AsRef<Path>>(&self, paths: &ArtifactPaths, reports_dir: P) -> Result<PathBuf> {
        paths.save(&self.vectorizer, &self.model)?;

        let reports_dir = reports_dir.as_ref();
        fs::create_dir_all(reports_dir)?;

        let report_path =
            reports_dir.join(format!("training_report_{}.json", self.report.timestamp));
        let mut writer = BufWriter::new(File::create(&report_path)?);
        serde_json::to_writer_pretty(&mut writer, &self.report)?;
        writer.flush()?;

        let predictions_path =
            reports_dir.join(format!("predictions_{}.csv", self.report.timestamp));
        let mut csv_writer = csv::Writer::from_path(&predictions_path)?;
        for prediction in &self.predictions {
            csv_writer.serialize(prediction)?;
        }
        csv_writer.flush()?;

        tracing::info!(
            report = %report_path.display(),
            predictions = %predictions_path.display(),
            "saved training report"
        );
        Ok(report_path)
    }
}

/// Runs the training pipeline.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
    normalizer: Normalizer,
}

impl Trainer {
    /// Create a trainer using the review normalizer.
    pub fn new(config: TrainingConfig) -> Self {
        Self::with_normalizer(config, Normalizer::new())
    }

    /// Create a trainer with a custom normalizer. Serving must use the same one.
    pub fn with_normalizer(config: TrainingConfig, normalizer: Normalizer) -> Self {
        Trainer { config, normalizer }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Normalize many texts in parallel, keeping their order.
    pub fn normalize_all(&self, texts: &[&str]) -> Result<Vec<String>> {
        texts
            .par_iter()
            .map(|text| self.normalizer.normalize(text).map(|n| n.into_string()))
            .collect()
    }

    /// Train and evaluate on a dataset.
    pub fn train(&self, dataset: &Dataset) -> Result<TrainingOutcome> {
        self.config.validate()?;
        if dataset.is_empty() {
            return Err(PolarityError::training("dataset is empty"));
        }

        let samples = dataset.samples();
        let labels: Vec<Label> = samples.iter().map(|s| s.label).collect();
        let (train_idx, test_idx) = stratified_split(&labels, self.config.test_size, self.config.seed);
        if test_idx.is_empty() {
            return Err(PolarityError::training(format!(
                "{} samples are too few to hold out a test split",
                samples.len()
            )));
        }
        tracing::info!(
            train = train_idx.len(),
            test = test_idx.len(),
            seed = self.config.seed,
            "split dataset"
        );

        let texts: Vec<&str> = samples.iter().map(|s| s.text.as_str()).collect();
        let normalized = self.normalize_all(&texts)?;

        let train_docs: Vec<&str> = train_idx.iter().map(|&i| normalized[i].as_str()).collect();
        let train_labels: Vec<Label> = train_idx.iter().map(|&i| labels[i]).collect();

        let mut vectorizer = TfIdfVectorizer::new(self.config.vectorizer.clone());
        let train_features = vectorizer.fit_transform(&train_docs)?;
        let model = self.config.classifier.fit(&train_features, &train_labels)?;

        let mut predictions = Vec::with_capacity(test_idx.len());
        for &i in &test_idx {
            let features = vectorizer.transform(&normalized[i])?;
            predictions.push(Prediction {
                text: samples[i].text.clone(),
                truth: labels[i],
                predicted: model.predict(&features)?,
            });
        }

        let truth: Vec<Label> = predictions.iter().map(|p| p.truth).collect();
        let predicted: Vec<Label> = predictions.iter().map(|p| p.predicted).collect();
        let evaluation = ClassificationReport::new(&truth, &predicted)?;
        tracing::info!(accuracy = evaluation.accuracy, "evaluated on held-out split");

        let created_at = Utc::now();
        let report = TrainingReport {
            timestamp: created_at.format("%Y%m%d_%H%M%S").to_string(),
            created_at,
            classifier: self.config.classifier.clone(),
            vectorizer: self.config.vectorizer.clone(),
            train_size: train_idx.len(),
            test_size: test_idx.len(),
            vocabulary_size: vectorizer.vocabulary_size(),
            evaluation,
        };

        Ok(TrainingOutcome {
            vectorizer,
            model,
            report,
            predictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::dataset::ReviewSample;
    use tempfile::TempDir;

    fn dataset() -> Dataset {
        let positive = [
            "Great sound and great battery",
            "Love this speaker, great value",
            "Excellent build, love it",
            "Great purchase, works perfectly",
            "Love the color and the great fit",
        ];
        let negative = [
            "Terrible battery, died fast",
            "Awful sound and terrible support",
            "Broken on arrival, awful",
            "Terrible quality, returned it",
            "Awful fit and broken zipper",
        ];
        let mut samples = Vec::new();
        for text in positive {
            samples.push(ReviewSample::new(text, Label::Positive));
        }
        for text in negative {
            samples.push(ReviewSample::new(text, Label::Negative));
        }
        Dataset::from_samples(samples)
    }

    #[test]
    fn test_stratified_split() {
        let labels: Vec<Label> = (0..20)
            .map(|i| if i < 15 { Label::Positive } else { Label::Negative })
            .collect();
        let (train, test) = stratified_split(&labels, 0.2, 42);
        assert_eq!(train.len() + test.len(), 20);
        assert_eq!(test.iter().filter(|&&i| labels[i] == Label::Positive).count(), 3);
        assert_eq!(test.iter().filter(|&&i| labels[i] == Label::Negative).count(), 1);

        let again = stratified_split(&labels, 0.2, 42);
        assert_eq!(again, (train, test));
    }

    #[test]
    fn test_split_keeps_a_training_sample() {
        let labels = [Label::Positive, Label::Negative];
        let (train, test) = stratified_split(&labels, 0.9, 1);
        assert_eq!(train, vec![0, 1]);
        assert!(test.is_empty());
    }

    #[test]
    fn test_train_and_save() {
        let trainer = Trainer::new(TrainingConfig::default());
        let outcome = trainer.train(&dataset()).unwrap();
        assert_eq!(outcome.report.train_size, 8);
        assert_eq!(outcome.report.test_size, 2);
        assert_eq!(outcome.predictions.len(), 2);
        assert_eq!(outcome.report.vocabulary_size, outcome.vectorizer.vocabulary_size());
        assert!(outcome.artifacts().is_ok());

        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path().join("models"));
        let report_path = outcome.save(&paths, dir.path().join("reports")).unwrap();
        assert!(report_path.exists());
        assert!(TrainedArtifacts::load(&paths).is_ok());

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert!(json["evaluation"]["accuracy"].is_number());
    }

    #[test]
    fn test_train_errors() {
        let trainer = Trainer::new(TrainingConfig::default());
        assert!(trainer.train(&Dataset::default()).is_err());

        let single = Dataset::from_samples(vec![ReviewSample::new("great", Label::Positive)]);
        assert!(matches!(trainer.train(&single), Err(PolarityError::Training(_))));

        let bad = Trainer::new(TrainingConfig {
            test_size: 1.5,
            ..Default::default()
        });
        assert!(matches!(bad.train(&dataset()), Err(PolarityError::Config(_))));
    }
}
