//! Char filters that rewrite the raw text before tokenization.
//!
//! The review pipeline uses a single [`PatternReplaceCharFilter`] that turns
//! every ASCII punctuation character into a space, so "great!it" becomes two
//! tokens instead of one.

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod pattern_replace;

pub use pattern_replace::PatternReplaceCharFilter;
