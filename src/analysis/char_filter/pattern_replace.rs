use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use super::CharFilter;

/// The 32 ASCII punctuation characters, as a regex character class.
pub const ASCII_PUNCTUATION_PATTERN: &str = "[[:punct:]]";

static ASCII_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ASCII_PUNCTUATION_PATTERN).expect("Invalid punctuation pattern"));

/// A char filter that replaces every match of a regex pattern.
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
}

impl PatternReplaceCharFilter {
    /// Replace each ASCII punctuation character with a single space.
    pub fn punctuation_to_space() -> Self {
        Self {
            pattern: ASCII_PUNCTUATION.clone(),
            replacement: " ".to_string(),
        }
    }
}

impl std::fmt::Debug for PatternReplaceCharFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternReplaceCharFilter")
            .field("pattern", &self.pattern.as_str())
            .field("replacement", &self.replacement)
            .finish()
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, NoExpand(&self.replacement))
            .into_owned()
    }

    fn name(&self) -> &'static str {
        "pattern_replace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_becomes_space() {
        let filter = PatternReplaceCharFilter::punctuation_to_space();
        assert_eq!(filter.filter("great!it's-fine"), "great it s fine");
    }

    #[test]
    fn test_all_ascii_punctuation_replaced() {
        let filter = PatternReplaceCharFilter::punctuation_to_space();
        let punct = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;
        assert_eq!(filter.filter(punct), " ".repeat(32));
    }

    #[test]
    fn test_non_ascii_punctuation_untouched() {
        let filter = PatternReplaceCharFilter::punctuation_to_space();
        assert_eq!(
            filter.filter("good\u{2026} \u{201C}ok\u{201D}"),
            "good\u{2026} \u{201C}ok\u{201D}"
        );
    }

    #[test]
    fn test_dollar_is_replaced_literally() {
        let filter = PatternReplaceCharFilter::punctuation_to_space();
        assert_eq!(filter.filter("$5 deal"), " 5 deal");
    }
}
