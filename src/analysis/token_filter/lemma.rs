//! Lemmatizing token filter and lemmatizer implementations.
//!
//! The lemma filter is the second stop-word pass of the review pipeline. Each
//! incoming token is re-split at punctuation (only non-ASCII punctuation can
//! still be present at this point), pieces the lemmatizer flags as stop words
//! or punctuation are dropped, and the remaining pieces are replaced by their
//! lemma. The lemmatizer's stop list is its own resource and is applied even
//! though the stop filter already ran.

use super::Filter;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Trait for lemmatization algorithms.
pub trait Lemmatizer: Send + Sync {
    /// Reduce a lowercase word to its dictionary base form.
    fn lemmatize(&self, word: &str) -> String;

    /// Whether the lemmatizer's language resource flags this word as a stop word.
    fn is_stop_word(&self, word: &str) -> bool;

    /// Whether the piece consists of punctuation only.
    fn is_punctuation(&self, piece: &str) -> bool {
        !piece.is_empty() && piece.chars().all(is_punctuation_char)
    }

    /// Get the name of this lemmatizer.
    fn name(&self) -> &'static str;
}

pub mod english;

pub use english::EnglishLemmatizer;

/// ASCII punctuation plus the common Unicode punctuation blocks.
pub fn is_punctuation_char(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(c,
            '\u{00A1}' | '\u{00A7}' | '\u{00AB}' | '\u{00B6}' | '\u{00B7}' | '\u{00BB}' | '\u{00BF}' |
            '\u{2010}'..='\u{2027}' |  // dashes, quotes, bullets, ellipsis
            '\u{2030}'..='\u{205E}' |  // per mille, primes, misc
            '\u{2E00}'..='\u{2E7F}' |  // supplemental punctuation
            '\u{3001}'..='\u{3003}' |
            '\u{3008}'..='\u{3011}' |
            '\u{FE50}'..='\u{FE6B}' |
            '\u{FF01}'..='\u{FF0F}' |
            '\u{FF1A}'..='\u{FF20}'
        )
}

/// Filter that lemmatizes tokens and applies the lemmatizer's stop/punctuation pass.
pub struct LemmaFilter {
    lemmatizer: Box<dyn Lemmatizer>,
}

impl std::fmt::Debug for LemmaFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LemmaFilter")
            .field("lemmatizer", &self.lemmatizer.name())
            .finish()
    }
}

impl LemmaFilter {
    /// Create a new lemma filter with the English lemmatizer.
    pub fn new() -> Self {
        LemmaFilter {
            lemmatizer: Box::new(EnglishLemmatizer::new()),
        }
    }

    /// Create a lemma filter with a custom lemmatizer.
    pub fn with_lemmatizer(lemmatizer: Box<dyn Lemmatizer>) -> Self {
        LemmaFilter { lemmatizer }
    }

    /// Split a token's text into word pieces and single punctuation characters,
    /// returning byte ranges relative to the token.
    fn split_pieces(text: &str) -> Vec<(usize, usize)> {
        let mut pieces = Vec::new();
        let mut start: Option<usize> = None;

        for (idx, c) in text.char_indices() {
            if is_punctuation_char(c) {
                if let Some(s) = start.take() {
                    pieces.push((s, idx));
                }
                pieces.push((idx, idx + c.len_utf8()));
            } else if start.is_none() {
                start = Some(idx);
            }
        }
        if let Some(s) = start {
            pieces.push((s, text.len()));
        }

        pieces
    }
}

impl Default for LemmaFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for LemmaFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let mut filtered_tokens = Vec::new();

        for token in tokens {
            if token.is_stopped() {
                filtered_tokens.push(token);
                continue;
            }

            for (start, end) in Self::split_pieces(&token.text) {
                let piece = &token.text[start..end];
                if self.lemmatizer.is_punctuation(piece) || self.lemmatizer.is_stop_word(piece) {
                    continue;
                }
                filtered_tokens.push(Token::new(
                    self.lemmatizer.lemmatize(piece),
                    filtered_tokens.len(),
                ));
            }
        }

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lemma"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(filter: &LemmaFilter, words: &[&str]) -> Vec<String> {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect();
        filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_lemma_filter() {
        let filter = LemmaFilter::new();
        let result = run(&filter, &["products", "loved", "batteries", "amazing"]);
        assert_eq!(result, vec!["product", "love", "battery", "amazing"]);
    }

    #[test]
    fn test_second_stop_pass() {
        let filter = LemmaFilter::new();
        // "really" and "well" survive the first stop list but not the lemmatizer's.
        let result = run(&filter, &["really", "works", "well"]);
        assert_eq!(result, vec!["work"]);
    }

    #[test]
    fn test_unicode_punctuation_split_and_dropped() {
        let filter = LemmaFilter::new();
        let result = run(&filter, &["\u{201C}great\u{201D}", "\u{2026}", "cable\u{2014}cheap"]);
        assert_eq!(result, vec!["great", "cable", "cheap"]);
    }

    #[test]
    fn test_positions_are_renumbered() {
        let filter = LemmaFilter::new();
        let tokens = vec![
            Token::new("really", 0),
            Token::new("cables", 1),
        ];
        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "cable");
        assert_eq!(result[0].position, 0);
    }

    #[test]
    fn test_stopped_tokens_pass_through() {
        let filter = LemmaFilter::new();
        let tokens = vec![Token::new("boxes", 0).stop()];
        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
        assert_eq!(result[0].text, "boxes");
        assert!(result[0].is_stopped());
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(LemmaFilter::new().name(), "lemma");
    }
}
