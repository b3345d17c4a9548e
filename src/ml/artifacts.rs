//! Trained artifacts: the fitted vectorizer paired with a trained classifier.
//!
//! Both halves are written as separate bincode files. Each file carries an
//! envelope with a format tag, a format version and the creation time, so a
//! file of the wrong kind or an older layout is rejected before its payload
//! is decoded.
//!
//! [`TrainedArtifacts`] is built once at start-up and then shared read-only.
//! Construction validates that the vectorizer is fitted, that the classifier
//! has one well-shaped row per label, and that the vocabulary size equals the
//! classifier's input dimension.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{PolarityError, Result};
use crate::ml::classifier::{Classifier, ClassifierModel};
use crate::ml::vectorizer::{FeatureVector, TfIdfVectorizer};

/// Default directory holding trained artifacts.
pub const DEFAULT_ARTIFACT_DIR: &str = "models";

/// Default file name of the fitted vectorizer.
pub const VECTORIZER_FILE: &str = "vectorizer.bin";

/// Default file name of the trained classifier.
pub const CLASSIFIER_FILE: &str = "classifier.bin";

/// Version of the on-disk envelope layout.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

const VECTORIZER_FORMAT: &str = "polarity/tfidf-vectorizer";
const CLASSIFIER_FORMAT: &str = "polarity/classifier";

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    format: &'a str,
    version: u32,
    created_at: DateTime<Utc>,
    payload: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeHeader {
    format: String,
    version: u32,
    created_at: DateTime<Utc>,
}

fn write_envelope<T: Serialize>(path: &Path, format: &str, payload: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let envelope = EnvelopeRef {
        format,
        version: ARTIFACT_FORMAT_VERSION,
        created_at: Utc::now(),
        payload,
    };
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, &envelope)?;
    writer.flush()?;
    Ok(())
}

fn read_envelope<T: DeserializeOwned>(path: &Path, format: &str) -> Result<(T, DateTime<Utc>)> {
    let bytes = fs::read(path).map_err(|e| {
        PolarityError::artifact_load(format!("cannot read {}: {e}", path.display()))
    })?;

    let header: EnvelopeHeader = bincode::deserialize(&bytes).map_err(|e| {
        PolarityError::artifact_load(format!("{} is not a polarity artifact: {e}", path.display()))
    })?;
    if header.format != format {
        return Err(PolarityError::artifact_load(format!(
            "{} holds {:?}, expected {:?}",
            path.display(),
            header.format,
            format
        )));
    }
    if header.version != ARTIFACT_FORMAT_VERSION {
        return Err(PolarityError::artifact_load(format!(
            "{} has format version {}, expected {}",
            path.display(),
            header.version,
            ARTIFACT_FORMAT_VERSION
        )));
    }

    // bincode lays a struct out as its fields in order, so the envelope
    // decodes as (header, payload).
    let (_, payload): (EnvelopeHeader, T) = bincode::deserialize(&bytes).map_err(|e| {
        PolarityError::artifact_load(format!("{} is corrupt: {e}", path.display()))
    })?;
    Ok((payload, header.created_at))
}

/// Locations of the two artifact files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
}

impl ArtifactPaths {
    /// Explicit file locations.
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(vectorizer: P, classifier: Q) -> Self {
        ArtifactPaths {
            vectorizer: vectorizer.into(),
            classifier: classifier.into(),
        }
    }

    /// The default file names inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(VECTORIZER_FILE), dir.join(CLASSIFIER_FILE))
    }

    /// Write a fitted vectorizer and a trained classifier.
    pub fn save(&self, vectorizer: &TfIdfVectorizer, classifier: &ClassifierModel) -> Result<()> {
        if !vectorizer.is_fitted() {
            return Err(PolarityError::contract_violation("cannot save an unfitted vectorizer"));
        }
        write_envelope(&self.vectorizer, VECTORIZER_FORMAT, vectorizer)?;
        write_envelope(&self.classifier, CLASSIFIER_FORMAT, classifier)?;
        tracing::info!(
            vectorizer = %self.vectorizer.display(),
            classifier = %self.classifier.display(),
            "saved trained artifacts"
        );
        Ok(())
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_ARTIFACT_DIR)
    }
}

/// Fitted vectorizer plus trained classifier, validated as a compatible pair.
#[derive(Clone)]
pub struct TrainedArtifacts {
    vectorizer: Arc<TfIdfVectorizer>,
    classifier: Arc<dyn Classifier>,
    created_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for TrainedArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedArtifacts")
            .field("vocabulary_size", &self.vectorizer.vocabulary_size())
            .field("classifier", &self.classifier.name())
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl TrainedArtifacts {
    /// Pair a vectorizer with any classifier, checking compatibility.
    pub fn new(vectorizer: TfIdfVectorizer, classifier: Arc<dyn Classifier>) -> Result<Self> {
        if !vectorizer.is_fitted() {
            return Err(PolarityError::artifact_load("vectorizer is not fitted"));
        }
        classifier.validate().map_err(|e| match e {
            PolarityError::ArtifactLoad(_) => e,
            other => PolarityError::artifact_load(other.to_string()),
        })?;
        if vectorizer.vocabulary_size() != classifier.input_dimension() {
            return Err(PolarityError::artifact_load(format!(
                "vocabulary size {} does not match classifier input dimension {}",
                vectorizer.vocabulary_size(),
                classifier.input_dimension()
            )));
        }
        Ok(TrainedArtifacts {
            vectorizer: Arc::new(vectorizer),
            classifier,
            created_at: None,
        })
    }

    /// Pair a vectorizer with one of the built-in classifier models.
    pub fn from_model(vectorizer: TfIdfVectorizer, model: ClassifierModel) -> Result<Self> {
        Self::new(vectorizer, Arc::new(model))
    }

    /// Load both files and validate the pair.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let (vectorizer, _) =
            read_envelope::<TfIdfVectorizer>(&paths.vectorizer, VECTORIZER_FORMAT)?;
        let (model, created_at) =
            read_envelope::<ClassifierModel>(&paths.classifier, CLASSIFIER_FORMAT)?;

        let mut artifacts = Self::from_model(vectorizer, model)?;
        artifacts.created_at = Some(created_at);

        tracing::info!(
            vocabulary_size = artifacts.vectorizer.vocabulary_size(),
            classifier = artifacts.classifier.name(),
            %created_at,
            "loaded trained artifacts"
        );
        Ok(artifacts)
    }

    /// Vectorize a normalized text.
    pub fn transform(&self, normalized: &str) -> Result<FeatureVector> {
        self.vectorizer.transform(normalized)
    }

    /// The fitted vectorizer.
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// The trained classifier.
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// When the classifier file was written, if loaded from disk.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::classifier::ClassifierConfig;
    use crate::ml::label::Label;
    use crate::ml::vectorizer::VectorizerConfig;
    use tempfile::TempDir;

    fn trained() -> (TfIdfVectorizer, ClassifierModel) {
        let corpus = ["great sound", "awful sound", "great price", "awful price"];
        let labels = [Label::Positive, Label::Negative, Label::Positive, Label::Negative];
        let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default());
        let features = vectorizer.fit_transform(&corpus).unwrap();
        let model = ClassifierConfig::default().fit(&features, &labels).unwrap();
        (vectorizer, model)
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path().join("nested"));
        let (vectorizer, model) = trained();
        paths.save(&vectorizer, &model).unwrap();

        let artifacts = TrainedArtifacts::load(&paths).unwrap();
        assert_eq!(artifacts.vectorizer().vocabulary_size(), vectorizer.vocabulary_size());
        assert!(artifacts.created_at().is_some());
        let v = artifacts.transform("great").unwrap();
        assert_eq!(artifacts.classifier().predict(&v).unwrap(), Label::Positive);
    }

    #[test]
    fn test_missing_files() {
        let dir = TempDir::new().unwrap();
        let err = TrainedArtifacts::load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, PolarityError::ArtifactLoad(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let (vectorizer, model) = trained();
        paths.save(&vectorizer, &model).unwrap();
        fs::write(&paths.classifier, b"not an artifact").unwrap();
        assert!(matches!(
            TrainedArtifacts::load(&paths),
            Err(PolarityError::ArtifactLoad(_))
        ));
    }

    #[test]
    fn test_swapped_files_rejected() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let (vectorizer, model) = trained();
        paths.save(&vectorizer, &model).unwrap();

        let swapped = ArtifactPaths::new(&paths.classifier, &paths.vectorizer);
        let err = TrainedArtifacts::load(&swapped).unwrap_err();
        assert!(err.to_string().contains("expected"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let (_, model) = trained();
        let mut other = TfIdfVectorizer::new(VectorizerConfig::default());
        other.fit(&["only one term here"]).unwrap();
        assert_ne!(other.vocabulary_size(), model.input_dimension());
        assert!(matches!(
            TrainedArtifacts::from_model(other, model),
            Err(PolarityError::ArtifactLoad(_))
        ));
    }

    fn decoded(json: serde_json::Value) -> ClassifierModel {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_malformed_classifier_fails_at_load() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let (vectorizer, _) = trained();
        let dim = vectorizer.vocabulary_size();

        let malformed = [
            decoded(serde_json::json!({"LogisticRegression": {
                "weights": [], "intercepts": [], "seen": [true, true, true], "dimension": dim
            }})),
            decoded(serde_json::json!({"LogisticRegression": {
                "weights": [vec![0.0; dim], vec![0.0; dim], [0.0]],
                "intercepts": [0.0, 0.0, 0.0], "seen": [true, true, true], "dimension": dim
            }})),
            decoded(serde_json::json!({"NearestCentroid": {
                "centroids": [vec![0.5; dim]], "centroid_norms": [1.0], "priors": [1.0],
                "dimension": dim
            }})),
            decoded(serde_json::json!({"NaiveBayes": {
                "class_log_prior": [0.0, 0.0, 0.0], "feature_log_prob": [vec![0.0; dim], [], []],
                "dimension": dim
            }})),
        ];
        for model in malformed {
            paths.save(&vectorizer, &model).unwrap();
            assert!(matches!(
                TrainedArtifacts::load(&paths),
                Err(PolarityError::ArtifactLoad(_))
            ));
        }
    }

    #[test]
    fn test_unfitted_vectorizer() {
        let (_, model) = trained();
        let unfitted = TfIdfVectorizer::new(VectorizerConfig::default());
        assert!(matches!(
            TrainedArtifacts::from_model(unfitted, model),
            Err(PolarityError::ArtifactLoad(_))
        ));
    }
}
