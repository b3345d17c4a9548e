//! Training, saving and loading artifacts for serving.

mod common;

use std::fs;

use polarity::error::PolarityError;
use polarity::ml::artifacts::{ArtifactPaths, TrainedArtifacts};
use polarity::ml::classifier::ClassifierKind;
use polarity::ml::dataset::{Dataset, ReviewSample};
use polarity::ml::label::Label;
use polarity::ml::training::{Trainer, TrainingConfig};
use polarity::sentiment::DecisionEngine;
use tempfile::TempDir;

fn assert_artifact_load(result: polarity::error::Result<TrainedArtifacts>) {
    match result {
        Err(PolarityError::ArtifactLoad(_)) => {}
        Err(other) => panic!("expected an artifact load error, got {other}"),
        Ok(_) => panic!("expected an artifact load error"),
    }
}

#[test]
fn test_saved_artifacts_serve_like_in_memory_ones() {
    for kind in [
        ClassifierKind::LogisticRegression,
        ClassifierKind::NaiveBayes,
        ClassifierKind::NearestCentroid,
    ] {
        let config = TrainingConfig {
            classifier: kind.default_config(),
            ..Default::default()
        };
        let outcome = Trainer::new(config).train(&common::dataset()).unwrap();
        assert_eq!(outcome.report.test_size, 3);

        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path().join("models"));
        let report_path = outcome.save(&paths, dir.path().join("reports")).unwrap();

        let file_name = report_path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("training_report_") && file_name.ends_with(".json"));
        let predictions = dir
            .path()
            .join("reports")
            .join(format!("predictions_{}.csv", outcome.report.timestamp));
        assert!(predictions.exists());

        let loaded = TrainedArtifacts::load(&paths).unwrap();
        assert!(loaded.created_at().is_some());
        assert_eq!(loaded.classifier().name(), kind.as_str());

        let from_disk = DecisionEngine::new(loaded);
        let in_memory = DecisionEngine::new(outcome.artifacts().unwrap());
        for (review, _) in common::REVIEWS {
            assert_eq!(
                from_disk.classify_detailed(review).unwrap(),
                in_memory.classify_detailed(review).unwrap()
            );
        }
    }
}

#[test]
fn test_missing_files() {
    let dir = TempDir::new().unwrap();
    assert_artifact_load(TrainedArtifacts::load(&ArtifactPaths::in_dir(dir.path())));
}

#[test]
fn test_corrupt_and_swapped_files() {
    let outcome = Trainer::new(TrainingConfig::default())
        .train(&common::dataset())
        .unwrap();
    let dir = TempDir::new().unwrap();
    let paths = ArtifactPaths::in_dir(dir.path());
    paths.save(&outcome.vectorizer, &outcome.model).unwrap();

    let swapped = ArtifactPaths::new(&paths.classifier, &paths.vectorizer);
    assert_artifact_load(TrainedArtifacts::load(&swapped));

    let truncated = dir.path().join("truncated.bin");
    let bytes = fs::read(&paths.classifier).unwrap();
    fs::write(&truncated, &bytes[..bytes.len() / 2]).unwrap();
    assert_artifact_load(TrainedArtifacts::load(&ArtifactPaths::new(
        &paths.vectorizer,
        &truncated,
    )));

    let garbage = dir.path().join("garbage.bin");
    fs::write(&garbage, b"definitely not bincode").unwrap();
    assert_artifact_load(TrainedArtifacts::load(&ArtifactPaths::new(
        &garbage,
        &paths.classifier,
    )));
}

#[test]
fn test_mismatched_pair() {
    let full = Trainer::new(TrainingConfig::default())
        .train(&common::dataset())
        .unwrap();
    let small = Dataset::from_samples(vec![
        ReviewSample::new("loud speaker", Label::Positive),
        ReviewSample::new("quiet speaker", Label::Positive),
        ReviewSample::new("dead screen", Label::Negative),
        ReviewSample::new("dim screen", Label::Negative),
    ]);
    let small = Trainer::new(TrainingConfig {
        test_size: 0.5,
        ..Default::default()
    })
    .train(&small)
    .unwrap();
    assert_ne!(
        full.vectorizer.vocabulary_size(),
        small.vectorizer.vocabulary_size()
    );

    let dir = TempDir::new().unwrap();
    let full_paths = ArtifactPaths::in_dir(dir.path().join("full"));
    let small_paths = ArtifactPaths::in_dir(dir.path().join("small"));
    full_paths.save(&full.vectorizer, &full.model).unwrap();
    small_paths.save(&small.vectorizer, &small.model).unwrap();

    assert_artifact_load(TrainedArtifacts::load(&ArtifactPaths::new(
        &full_paths.vectorizer,
        &small_paths.classifier,
    )));
}
