//! Whitespace tokenizer implementation.
//!
//! Splitting on runs of whitespace both collapses repeated whitespace and
//! trims the ends, so no empty tokens are ever produced.

use super::Tokenizer;

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Whitespace for tokenizing and empty-input checks:
/// Unicode `White_Space` plus the ASCII information separators U+001C..U+001F.
pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c)
}

/// A tokenizer that splits text on whitespace.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut start: Option<usize> = None;

        for (idx, c) in text.char_indices() {
            match (is_whitespace(c), start) {
                (true, Some(s)) => {
                    tokens.push(Token::new(&text[s..idx], tokens.len()));
                    start = None;
                }
                (false, None) => start = Some(idx),
                _ => {}
            }
        }
        if let Some(s) = start {
            tokens.push(Token::new(&text[s..], tokens.len()));
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_tokenizer() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens: Vec<Token> = tokenizer
            .tokenize("  works  great\tfor\nme ")
            .unwrap()
            .collect();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].text, "works");
        assert_eq!(tokens[1].text, "great");
        assert_eq!(tokens[1].position, 1);
        assert_eq!(tokens[3].text, "me");
        assert_eq!(tokens[3].position, 3);
    }

    #[test]
    fn test_information_separators_split() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("a\u{1F}b\u{A0}c").unwrap().collect();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_whitespace_only() {
        let tokenizer = WhitespaceTokenizer::new();
        assert_eq!(tokenizer.tokenize(" \t\n ").unwrap().count(), 0);
        assert_eq!(tokenizer.tokenize("").unwrap().count(), 0);
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(WhitespaceTokenizer::new().name(), "whitespace");
    }
}
