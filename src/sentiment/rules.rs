//! Override rules as data.
//!
//! An [`OverrideRule`] pairs a matcher with the label it forces. Keyword
//! matchers test whole normalized tokens; pattern matchers search the
//! lowercased raw text, which still has the word order and function words
//! ("not", "could", "did") that normalization strips.
//!
//! A [`RuleSet`] is an ordered list of rules. Order is precedence: the
//! override engine applies every matching rule in turn, so the last match
//! decides.
//!
//! # Rule files
//!
//! ```json
//! [
//!   {"type": "keywords", "name": "negative_keywords", "target": "negative",
//!    "keywords": ["bad", "broken"]},
//!   {"type": "patterns", "name": "negations", "target": "negative",
//!    "patterns": ["not\\s+good"]}
//! ]
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::NormalizedText;
use crate::error::{PolarityError, Result};
use crate::ml::label::Label;

/// Keywords that force a negative label.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "bad", "poor", "cheap", "worst", "disappointed", "terrible", "awful", "broken", "horrible",
    "useless", "waste", "dirty", "faulty", "unhappy", "unusable", "damaged", "hate",
];

/// Keywords that force a positive label.
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "amazing", "excellent", "great", "love", "wonderful", "perfect", "awesome", "superb",
    "fantastic", "impressive",
];

/// Negation patterns searched in the lowercased raw text.
pub const NEGATION_PATTERNS: &[&str] = &[
    r"not\s+(good|great|happy|amazing|worth|satisfied|recommended)",
    r"could\s+be\s+(better|improved)",
    r"was\s+expecting\s+more",
    r"did\s+not\s+like",
    r"no\s+value",
];

static NEGATION_SET: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new(NEGATION_PATTERNS).expect("Invalid negation patterns"));

/// What a rule looks at.
#[derive(Debug, Clone)]
pub enum RuleMatcher {
    /// Fires when any normalized token is in the set.
    Keywords(BTreeSet<String>),
    /// Fires when any pattern is found in the lowercased raw text.
    Patterns(RegexSet),
}

impl RuleMatcher {
    /// Whether the matcher needs the lowercased raw text.
    pub fn uses_raw_text(&self) -> bool {
        matches!(self, RuleMatcher::Patterns(_))
    }

    /// Test the matcher. `raw_lower` must already be lowercased.
    pub fn matches(&self, raw_lower: &str, normalized: &NormalizedText) -> bool {
        match self {
            RuleMatcher::Keywords(keywords) => normalized.tokens().any(|t| keywords.contains(t)),
            RuleMatcher::Patterns(patterns) => patterns.is_match(raw_lower),
        }
    }
}

/// A matcher with the label it forces.
#[derive(Debug, Clone)]
pub struct OverrideRule {
    pub name: String,
    pub matcher: RuleMatcher,
    pub target: Label,
}

impl OverrideRule {
    /// A keyword rule. Keywords are lowercased; keywords containing
    /// whitespace can never equal a single token and are dropped.
    pub fn keywords<N, I, S>(name: N, keywords: I, target: Label) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let mut set = BTreeSet::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if keyword.is_empty() {
                continue;
            }
            if keyword.chars().any(char::is_whitespace) {
                tracing::warn!(rule = %name, keyword = %keyword, "multi-word keyword can never match");
                continue;
            }
            set.insert(keyword);
        }
        OverrideRule {
            name,
            matcher: RuleMatcher::Keywords(set),
            target,
        }
    }

    /// A pattern rule.
    pub fn patterns<N, I, S>(name: N, patterns: I, target: Label) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let set = RegexSet::new(patterns).map_err(|e| {
            PolarityError::config(format!("rule {name:?} has an invalid pattern: {e}"))
        })?;
        Ok(OverrideRule {
            name,
            matcher: RuleMatcher::Patterns(set),
            target,
        })
    }

    /// Whether this rule fires.
    pub fn matches(&self, raw_lower: &str, normalized: &NormalizedText) -> bool {
        self.matcher.matches(raw_lower, normalized)
    }

    /// Serializable description of the rule.
    pub fn to_spec(&self) -> RuleSpec {
        match &self.matcher {
            RuleMatcher::Keywords(keywords) => RuleSpec::Keywords {
                name: self.name.clone(),
                target: self.target,
                keywords: keywords.iter().cloned().collect(),
            },
            RuleMatcher::Patterns(patterns) => RuleSpec::Patterns {
                name: self.name.clone(),
                target: self.target,
                patterns: patterns.patterns().to_vec(),
            },
        }
    }
}

/// On-disk form of an [`OverrideRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleSpec {
    Keywords {
        name: String,
        target: Label,
        keywords: Vec<String>,
    },
    Patterns {
        name: String,
        target: Label,
        patterns: Vec<String>,
    },
}

impl TryFrom<RuleSpec> for OverrideRule {
    type Error = PolarityError;

    fn try_from(spec: RuleSpec) -> Result<Self> {
        match spec {
            RuleSpec::Keywords {
                name,
                target,
                keywords,
            } => Ok(OverrideRule::keywords(name, keywords, target)),
            RuleSpec::Patterns {
                name,
                target,
                patterns,
            } => OverrideRule::patterns(name, patterns, target),
        }
    }
}

/// Ordered override rules; later rules take precedence.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<OverrideRule>,
}

impl RuleSet {
    /// An empty rule set; the classifier label always stands.
    pub fn empty() -> Self {
        RuleSet { rules: Vec::new() }
    }

    /// Rules in precedence order.
    pub fn new(rules: Vec<OverrideRule>) -> Self {
        RuleSet { rules }
    }

    /// The review rules: negative keywords, then positive keywords, then
    /// negation patterns.
    pub fn english() -> Self {
        let negations = OverrideRule {
            name: "negation_patterns".to_string(),
            matcher: RuleMatcher::Patterns(NEGATION_SET.clone()),
            target: Label::Negative,
        };
        RuleSet::new(vec![
            OverrideRule::keywords("negative_keywords", NEGATIVE_KEYWORDS, Label::Negative),
            OverrideRule::keywords("positive_keywords", POSITIVE_KEYWORDS, Label::Positive),
            negations,
        ])
    }

    /// Parse a JSON array of rule specs.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let specs: Vec<RuleSpec> = serde_json::from_str(json)
            .map_err(|e| PolarityError::config(format!("invalid rule file: {e}")))?;
        Self::from_specs(specs)
    }

    /// Build from rule specs.
    pub fn from_specs(specs: Vec<RuleSpec>) -> Result<Self> {
        let rules = specs
            .into_iter()
            .map(OverrideRule::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(RuleSet { rules })
    }

    /// Load a JSON rule file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            PolarityError::config(format!("cannot read rule file {}: {e}", path.display()))
        })?;
        let rules = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), rules = rules.len(), "loaded override rules");
        Ok(rules)
    }

    /// Specs of every rule, in order.
    pub fn to_specs(&self) -> Vec<RuleSpec> {
        self.rules.iter().map(OverrideRule::to_spec).collect()
    }

    /// Append a rule with the highest precedence so far.
    pub fn push(&mut self, rule: OverrideRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[OverrideRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any rule needs the lowercased raw text.
    pub fn uses_raw_text(&self) -> bool {
        self.rules.iter().any(|r| r.matcher.uses_raw_text())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(s: &str) -> NormalizedText {
        NormalizedText::from_normalized(s)
    }

    #[test]
    fn test_keyword_rule_matches_whole_tokens() {
        let rule = OverrideRule::keywords("neg", ["bad", "Broken"], Label::Negative);
        assert!(rule.matches("", &normalized("item broken cheap")));
        assert!(!rule.matches("", &normalized("badge brokenness")));
        assert!(!rule.matches("bad", &normalized("")));
    }

    #[test]
    fn test_multi_word_keywords_dropped() {
        let rule = OverrideRule::keywords("neg", ["low quality", "poor"], Label::Negative);
        match &rule.matcher {
            RuleMatcher::Keywords(set) => assert_eq!(set.len(), 1),
            _ => panic!("expected keywords"),
        }
    }

    #[test]
    fn test_pattern_rule_searches_raw_text() {
        let rule = OverrideRule::patterns("neg", NEGATION_PATTERNS, Label::Negative).unwrap();
        assert!(rule.matches("it was not  worth it", &normalized("")));
        assert!(rule.matches("this could be\nimproved", &normalized("")));
        assert!(rule.matches("i did not like the color", &normalized("")));
        assert!(rule.matches("cannot good", &normalized("")));
        assert!(!rule.matches("good value", &normalized("good value")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = OverrideRule::patterns("broken", ["(unclosed"], Label::Negative).unwrap_err();
        assert!(matches!(err, PolarityError::Config(_)));
    }

    #[test]
    fn test_english_rules_order() {
        let rules = RuleSet::english();
        let names: Vec<_> = rules.rules().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["negative_keywords", "positive_keywords", "negation_patterns"]);
        assert!(rules.uses_raw_text());
    }

    #[test]
    fn test_json_round_trip() {
        let json = serde_json::to_string(&RuleSet::english().to_specs()).unwrap();
        let rules = RuleSet::from_json_str(&json).unwrap();
        assert_eq!(rules.to_specs(), RuleSet::english().to_specs());
    }

    #[test]
    fn test_json_rule_file() {
        let rules = RuleSet::from_json_str(
            r#"[
                {"type": "keywords", "name": "meh", "target": "neutral", "keywords": ["okay"]},
                {"type": "patterns", "name": "nope", "target": "negative", "patterns": ["never\\s+again"]}
            ]"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rules()[0].target, Label::Neutral);

        assert!(RuleSet::from_json_str(r#"[{"type": "regex"}]"#).is_err());
        assert!(
            RuleSet::from_json_str(
                r#"[{"type": "patterns", "name": "x", "target": "negative", "patterns": ["("]}]"#
            )
            .is_err()
        );
    }
}
