//! Review text normalization.
//!
//! A [`Normalizer`] runs an [`Analyzer`] over raw review text and joins the
//! surviving tokens with single spaces. The result is a [`NormalizedText`],
//! the only form of text the feature transformer and the keyword rules see.
//!
//! # Examples
//!
//! ```
//! use polarity::analysis::normalizer::Normalizer;
//!
//! let normalizer = Normalizer::new();
//! let normalized = normalizer.normalize("The item was broken and cheap").unwrap();
//!
//! assert_eq!(normalized.as_str(), "item broken cheap");
//! assert!(normalized.tokens().any(|t| t == "broken"));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, ReviewAnalyzer};
use crate::error::Result;

/// Space-separated, lowercase, lemmatized tokens with stop words removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Wrap a string that is already in normalized form.
    pub fn from_normalized<S: Into<String>>(text: S) -> Self {
        NormalizedText(text.into())
    }

    /// The normalized string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the normalized tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|t| !t.is_empty())
    }

    /// Whether normalization left nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turns raw review text into [`NormalizedText`].
///
/// Cheap to clone; the analyzer is shared.
#[derive(Clone)]
pub struct Normalizer {
    analyzer: Arc<dyn Analyzer>,
}

impl Normalizer {
    /// Create a normalizer backed by the [`ReviewAnalyzer`].
    pub fn new() -> Self {
        Self::with_analyzer(Arc::new(ReviewAnalyzer::new()))
    }

    /// Create a normalizer backed by a custom analyzer.
    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>) -> Self {
        Normalizer { analyzer }
    }

    /// Normalize raw text. Only a custom analyzer can make this fail.
    pub fn normalize(&self, raw: &str) -> Result<NormalizedText> {
        let tokens = self.analyzer.analyze(raw)?;
        let mut normalized = String::with_capacity(raw.len());
        for token in tokens.filter(|t| !t.is_stopped() && !t.is_empty()) {
            if !normalized.is_empty() {
                normalized.push(' ');
            }
            normalized.push_str(&token.text);
        }
        Ok(NormalizedText(normalized))
    }

    /// Name of the underlying analyzer.
    pub fn analyzer_name(&self) -> &'static str {
        self.analyzer.name()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::{Token, TokenStream};
    use crate::error::PolarityError;

    #[test]
    fn test_normalize() {
        let normalizer = Normalizer::new();
        let normalized = normalizer
            .normalize("This product is amazing and works great")
            .unwrap();
        assert_eq!(normalized.as_str(), "product amazing work great");
        assert_eq!(normalized.tokens().count(), 4);
    }

    #[test]
    fn test_empty_input_normalizes_to_empty() {
        let normalizer = Normalizer::new();
        assert!(normalizer.normalize("").unwrap().is_empty());
        assert!(normalizer.normalize("   \n\t").unwrap().is_empty());
        assert!(normalizer.normalize("the and of").unwrap().is_empty());
    }

    #[test]
    fn test_idempotent_on_normal_form() {
        let normalizer = Normalizer::new();
        for raw in [
            "Loved the batteries, they charge quickly!",
            "Not good, I was expecting more",
            "Terrible customer service... the box arrived damaged.",
        ] {
            let once = normalizer.normalize(raw).unwrap();
            let twice = normalizer.normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "{raw}");
        }
    }

    struct FailingAnalyzer;

    impl Analyzer for FailingAnalyzer {
        fn analyze(&self, _text: &str) -> Result<TokenStream> {
            Err(PolarityError::analysis("boom"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct StoppingAnalyzer;

    impl Analyzer for StoppingAnalyzer {
        fn analyze(&self, text: &str) -> Result<TokenStream> {
            let tokens: Vec<Token> = text
                .split_whitespace()
                .enumerate()
                .map(|(i, w)| if i % 2 == 0 { Token::new(w, i) } else { Token::new(w, i).stop() })
                .collect();
            Ok(Box::new(tokens.into_iter()))
        }

        fn name(&self) -> &'static str {
            "stopping"
        }
    }

    #[test]
    fn test_custom_analyzer() {
        let normalizer = Normalizer::with_analyzer(Arc::new(StoppingAnalyzer));
        assert_eq!(normalizer.normalize("a b c d").unwrap().as_str(), "a c");
        assert_eq!(normalizer.analyzer_name(), "stopping");

        let failing = Normalizer::with_analyzer(Arc::new(FailingAnalyzer));
        assert!(matches!(
            failing.normalize("anything"),
            Err(PolarityError::Analysis(_))
        ));
    }
}
