//! # Polarity
//!
//! Hybrid sentiment classification for product reviews.
//!
//! A review goes through four stages:
//!
//! 1. [`analysis`] normalizes the raw text (punctuation, whitespace, case,
//!    stop words, lemmas).
//! 2. [`ml`] turns the normalized text into a tf-idf vector and asks a
//!    trained classifier for a label.
//! 3. [`sentiment`] lets keyword and negation rules override that label.
//! 4. [`api`] and [`cli`] expose the result over HTTP and the command line.
//!
//! ```
//! use polarity::analysis::Normalizer;
//!
//! let normalized = Normalizer::new().normalize("Great sound, terrible battery!").unwrap();
//! assert_eq!(normalized.as_str(), "great sound terrible battery");
//! ```

pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod ml;
pub mod sentiment;

pub mod prelude {
    pub use crate::analysis::{NormalizedText, Normalizer};
    pub use crate::error::{PolarityError, Result};
    pub use crate::ml::{ArtifactPaths, Dataset, Label, Trainer, TrainedArtifacts, TrainingConfig};
    pub use crate::sentiment::{Decision, DecisionEngine, RuleSet};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
