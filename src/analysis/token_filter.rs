//! Token filter implementations for token transformation.
//!
//! # Available Filters
//!
//! - [`lowercase::LowercaseFilter`] - Converts tokens to lowercase
//! - [`stop::StopFilter`] - Removes stop words
//! - [`lemma::LemmaFilter`] - Reduces words to their lemma, dropping the
//!   lemmatizer's own stop words and punctuation
//!
//! # Examples
//!
//! ```
//! use polarity::analysis::token_filter::Filter;
//! use polarity::analysis::token_filter::lowercase::LowercaseFilter;
//! use polarity::analysis::token::Token;
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Amazing", 0), Token::new("PRODUCT", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "amazing");
//! assert_eq!(filtered[1].text, "product");
//! ```
//!
//! # Filter Chaining
//!
//! ```text
//! Tokenizer → Lowercase → Stop Words → Lemmatizer
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lemma;
pub mod lowercase;
pub mod stop;

pub use lemma::{EnglishLemmatizer, LemmaFilter, Lemmatizer};
pub use lowercase::LowercaseFilter;
pub use stop::StopFilter;
