//! Analyzers that combine char filters, a tokenizer and token filters.
//!
//! ```text
//! Raw Text → Char Filters → Tokenizer → Filter 1 → ... → Filter N → Tokens
//! ```
//!
//! # Available Implementations
//!
//! - [`PipelineAnalyzer`] - Custom char filter + tokenizer + filter chains
//! - [`ReviewAnalyzer`] - The review normalization pipeline used for both
//!   training and serving
//!
//! # Examples
//!
//! ```
//! use polarity::analysis::analyzer::{Analyzer, ReviewAnalyzer};
//!
//! let analyzer = ReviewAnalyzer::new();
//! let tokens: Vec<_> = analyzer.analyze("The batteries were AMAZING!").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "battery");
//! assert_eq!(tokens[1].text, "amazing");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod pipeline;
pub mod review;

pub use pipeline::PipelineAnalyzer;
pub use review::ReviewAnalyzer;
