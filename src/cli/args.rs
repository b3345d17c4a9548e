//! Command line argument parsing for the polarity CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::ml::artifacts::{ArtifactPaths, CLASSIFIER_FILE, DEFAULT_ARTIFACT_DIR, VECTORIZER_FILE};
use crate::ml::classifier::ClassifierKind;
use crate::ml::training::{DEFAULT_REPORTS_DIR, DEFAULT_SEED, DEFAULT_TEST_SIZE};
use crate::ml::vectorizer::DEFAULT_MAX_FEATURES;

/// Polarity - hybrid sentiment classification for product reviews
#[derive(Parser, Debug, Clone)]
#[command(name = "polarity")]
#[command(about = "Hybrid sentiment classification for product reviews")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PolarityArgs {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PolarityArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }

    /// Log filter implied by the verbosity flags, used when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity() {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the normalized form of reviews
    Normalize(NormalizeArgs),

    /// Classify reviews with trained artifacts
    Classify(ClassifyArgs),

    /// Train a vectorizer and classifier on a labelled dataset
    Train(TrainArgs),

    /// Evaluate the full decision engine on a labelled dataset
    Evaluate(EvaluateArgs),

    /// Serve the HTTP API
    Serve(ServeArgs),
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Where to find the trained artifacts.
#[derive(Args, Debug, Clone)]
pub struct ArtifactArgs {
    /// Directory holding the artifact files
    #[arg(long, env = "POLARITY_ARTIFACT_DIR", default_value = DEFAULT_ARTIFACT_DIR)]
    pub artifact_dir: PathBuf,

    /// Vectorizer file name inside the artifact directory
    #[arg(long, default_value = VECTORIZER_FILE)]
    pub vectorizer_file: PathBuf,

    /// Classifier file name inside the artifact directory
    #[arg(long, default_value = CLASSIFIER_FILE)]
    pub classifier_file: PathBuf,
}

impl ArtifactArgs {
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(
            self.artifact_dir.join(&self.vectorizer_file),
            self.artifact_dir.join(&self.classifier_file),
        )
    }
}

/// Arguments for the normalize command.
#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// Reviews to normalize; read from stdin, one per line, when omitted
    #[arg(value_name = "REVIEW")]
    pub reviews: Vec<String>,
}

/// Arguments for the classify command.
#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Reviews to classify; read from stdin, one per line, when omitted
    #[arg(value_name = "REVIEW")]
    pub reviews: Vec<String>,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// JSON override rules replacing the built-in ones
    #[arg(long, env = "POLARITY_RULES")]
    pub rules: Option<PathBuf>,

    /// Show the classifier label, scores and fired rules
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the train command.
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// CSV file, directory of CSV files, or JSON file of labelled reviews
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Directory to write the artifacts to
    #[arg(long, env = "POLARITY_ARTIFACT_DIR", default_value = DEFAULT_ARTIFACT_DIR)]
    pub artifact_dir: PathBuf,

    /// Directory to write the training report and predictions to
    #[arg(long, default_value = DEFAULT_REPORTS_DIR)]
    pub reports_dir: PathBuf,

    /// Classifier family
    #[arg(short, long, default_value = "logistic-regression")]
    pub classifier: ClassifierKind,

    /// Fraction of each label held out for evaluation
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
    pub test_size: f64,

    /// Seed of the train/test split
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Vocabulary size cap
    #[arg(long, default_value_t = DEFAULT_MAX_FEATURES)]
    pub max_features: usize,

    /// Longest n-gram in the vocabulary
    #[arg(long, default_value_t = 2)]
    pub max_ngram: usize,

    /// Inverse regularization strength (logistic regression)
    #[arg(short = 'C', long = "regularization")]
    pub c: Option<f64>,

    /// Gradient descent iterations (logistic regression)
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// Additive smoothing (naive Bayes)
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Train and report without writing any file
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the evaluate command.
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// CSV file, directory of CSV files, or JSON file of labelled reviews
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// JSON override rules replacing the built-in ones
    #[arg(long, env = "POLARITY_RULES")]
    pub rules: Option<PathBuf>,

    /// Evaluate the classifier alone, without override rules
    #[arg(long)]
    pub no_overrides: bool,
}

/// Arguments for the serve command.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// JSON service configuration file
    #[arg(short, long, env = "POLARITY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen host (default: 127.0.0.1)
    #[arg(long, env = "POLARITY_HOST")]
    pub host: Option<String>,

    /// Listen port (default: 5000)
    #[arg(short, long, env = "POLARITY_PORT")]
    pub port: Option<u16>,

    /// Directory holding the artifact files
    #[arg(long, env = "POLARITY_ARTIFACT_DIR")]
    pub artifact_dir: Option<PathBuf>,

    /// JSON override rules replacing the built-in ones
    #[arg(long, env = "POLARITY_RULES")]
    pub rules: Option<PathBuf>,
}
