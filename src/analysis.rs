//! Text analysis for review normalization.
//!
//! This module turns raw review text into the normalized token string that
//! both the feature transformer and the keyword override rules consume.
//!
//! # Pipeline
//!
//! ```text
//! Raw Text → Char Filter → Tokenizer → Lowercase → Stop Words → Lemmatizer → Normalized Text
//! ```
//!
//! # Examples
//!
//! ```
//! use polarity::analysis::normalizer::Normalizer;
//!
//! let normalizer = Normalizer::new();
//! let normalized = normalizer.normalize("Not good, I was expecting more!").unwrap();
//!
//! assert_eq!(normalized.as_str(), "good expect");
//! ```

pub mod analyzer;
pub mod char_filter;
pub mod normalizer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, ReviewAnalyzer};
pub use normalizer::{NormalizedText, Normalizer};
pub use token::{Token, TokenStream};
