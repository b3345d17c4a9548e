//! Sentiment labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PolarityError, Result};

/// One of the three sentiment labels.
///
/// Variant order is the alphabetical order of the label names; classifiers
/// index their per-label parameters by [`Label::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Negative,
    Neutral,
    Positive,
}

impl Label {
    /// All labels in index order.
    pub const ALL: [Label; 3] = [Label::Negative, Label::Neutral, Label::Positive];

    /// Number of labels.
    pub const COUNT: usize = 3;

    /// Position of this label in [`Label::ALL`].
    pub fn index(self) -> usize {
        match self {
            Label::Negative => 0,
            Label::Neutral => 1,
            Label::Positive => 2,
        }
    }

    /// Label at the given index.
    pub fn from_index(index: usize) -> Option<Label> {
        Self::ALL.get(index).copied()
    }

    /// Label derived from a star rating: 4 and above is positive, 2 and
    /// below is negative, anything else neutral.
    pub fn from_rating(rating: f64) -> Label {
        if rating >= 4.0 {
            Label::Positive
        } else if rating <= 2.0 {
            Label::Negative
        } else {
            Label::Neutral
        }
    }

    /// Lowercase name of the label.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Negative => "negative",
            Label::Neutral => "neutral",
            Label::Positive => "positive",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = PolarityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "negative" | "neg" => Ok(Label::Negative),
            "neutral" | "neu" => Ok(Label::Neutral),
            "positive" | "pos" => Ok(Label::Positive),
            other => Err(PolarityError::dataset(format!("unknown sentiment label: {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rating() {
        assert_eq!(Label::from_rating(5.0), Label::Positive);
        assert_eq!(Label::from_rating(4.0), Label::Positive);
        assert_eq!(Label::from_rating(3.0), Label::Neutral);
        assert_eq!(Label::from_rating(3.5), Label::Neutral);
        assert_eq!(Label::from_rating(2.0), Label::Negative);
        assert_eq!(Label::from_rating(1.0), Label::Negative);
    }

    #[test]
    fn test_index_round_trip() {
        for label in Label::ALL {
            assert_eq!(Label::from_index(label.index()), Some(label));
        }
        assert_eq!(Label::from_index(3), None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Positive".parse::<Label>().unwrap(), Label::Positive);
        assert_eq!(" neg ".parse::<Label>().unwrap(), Label::Negative);
        assert!("meh".parse::<Label>().is_err());
        assert_eq!(Label::Neutral.to_string(), "neutral");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Label::Negative).unwrap(), "\"negative\"");
        let label: Label = serde_json::from_str("\"positive\"").unwrap();
        assert_eq!(label, Label::Positive);
    }
}
