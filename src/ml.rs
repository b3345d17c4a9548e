//! Machine learning: features, classifiers, artifacts and training.
//!
//! - [`vectorizer`] - TF-IDF feature extraction over normalized text
//! - [`classifier`] - The [`Classifier`](classifier::Classifier) trait and built-in families
//! - [`artifacts`] - Persisted vectorizer/classifier pairs
//! - [`dataset`] - Labelled review ingestion
//! - [`training`] - Split, fit and evaluate
//! - [`evaluation`] - Classification metrics

pub mod artifacts;
pub mod classifier;
pub mod dataset;
pub mod evaluation;
pub mod label;
pub mod training;
pub mod vectorizer;

pub use artifacts::{ArtifactPaths, TrainedArtifacts};
pub use classifier::{Classifier, ClassifierConfig, ClassifierKind, ClassifierModel};
pub use dataset::{Dataset, ReviewSample};
pub use evaluation::ClassificationReport;
pub use label::Label;
pub use training::{Trainer, TrainingConfig, TrainingOutcome};
pub use vectorizer::{FeatureVector, TfIdfVectorizer, VectorizerConfig};
