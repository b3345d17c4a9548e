//! Review analyzer used to normalize product reviews.
//!
//! # Pipeline
//!
//! 1. PatternReplaceCharFilter (ASCII punctuation → space)
//! 2. WhitespaceTokenizer (collapses runs, trims the ends)
//! 3. LowercaseFilter
//! 4. StopFilter (179 English stop words)
//! 5. LemmaFilter (lemmatizer stop words and punctuation dropped, lemmas emitted)
//!
//! The same analyzer runs when the feature vocabulary is fitted and when
//! reviews are classified, so both paths see identical tokens.
//!
//! # Examples
//!
//! ```
//! use polarity::analysis::analyzer::{Analyzer, ReviewAnalyzer};
//!
//! let analyzer = ReviewAnalyzer::new();
//! let tokens: Vec<_> = analyzer
//!     .analyze("This product is amazing and works great")
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//!
//! assert_eq!(tokens, vec!["product", "amazing", "work", "great"]);
//! ```

use std::sync::Arc;

use super::Analyzer;
use super::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::PatternReplaceCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{LemmaFilter, Lemmatizer, LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::WhitespaceTokenizer;
use crate::error::Result;

/// The two-pass review normalization pipeline.
pub struct ReviewAnalyzer {
    inner: PipelineAnalyzer,
}

impl ReviewAnalyzer {
    /// Create a review analyzer with the English resources.
    pub fn new() -> Self {
        Self::with_resources(StopFilter::new(), LemmaFilter::new())
    }

    /// Create a review analyzer with a custom lemmatizer.
    pub fn with_lemmatizer(lemmatizer: Box<dyn Lemmatizer>) -> Self {
        Self::with_resources(StopFilter::new(), LemmaFilter::with_lemmatizer(lemmatizer))
    }

    /// Create a review analyzer from explicit stop and lemma resources.
    pub fn with_resources(stop_filter: StopFilter, lemma_filter: LemmaFilter) -> Self {
        let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::punctuation_to_space()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(stop_filter))
            .add_filter(Arc::new(lemma_filter))
            .with_name("review");

        ReviewAnalyzer { inner: analyzer }
    }

    /// Get the inner pipeline analyzer.
    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Default for ReviewAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for ReviewAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "review"
    }
}

impl std::fmt::Debug for ReviewAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}
