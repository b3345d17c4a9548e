//! Rule-based overrides of the classifier label.

use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::NormalizedText;
use crate::ml::label::Label;
use crate::sentiment::rules::RuleSet;

/// Result of running the override rules over one review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideOutcome {
    /// Final label.
    pub label: Label,
    /// Names of the rules that fired, in evaluation order.
    pub fired_rules: Vec<String>,
}

impl OverrideOutcome {
    /// Whether any rule fired.
    pub fn overridden(&self) -> bool {
        !self.fired_rules.is_empty()
    }
}

/// Applies a [`RuleSet`] to a classifier label.
///
/// Every rule is evaluated in order and each one that fires replaces the
/// current label, so the last firing rule decides. With the default rules a
/// negation pattern beats a positive keyword, which beats a negative keyword.
#[derive(Debug, Clone, Default)]
pub struct OverrideEngine {
    rules: RuleSet,
}

impl OverrideEngine {
    pub fn new(rules: RuleSet) -> Self {
        OverrideEngine { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Decide the final label from the raw review, its normalized form and
    /// the classifier's label.
    pub fn apply(
        &self,
        raw: &str,
        normalized: &NormalizedText,
        classifier_label: Label,
    ) -> OverrideOutcome {
        let raw_lower = if self.rules.uses_raw_text() {
            raw.to_lowercase()
        } else {
            String::new()
        };

        let mut label = classifier_label;
        let mut fired_rules = Vec::new();
        for rule in self.rules.rules() {
            if rule.matches(&raw_lower, normalized) {
                label = rule.target;
                fired_rules.push(rule.name.clone());
            }
        }

        OverrideOutcome { label, fired_rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::rules::OverrideRule;

    fn apply(raw: &str, normalized: &str, label: Label) -> OverrideOutcome {
        OverrideEngine::default().apply(raw, &NormalizedText::from_normalized(normalized), label)
    }

    #[test]
    fn test_no_rule_keeps_classifier_label() {
        let outcome = apply("It's fine I guess", "fine guess", Label::Neutral);
        assert_eq!(outcome.label, Label::Neutral);
        assert!(!outcome.overridden());
    }

    #[test]
    fn test_negative_keyword() {
        let outcome = apply("The item was broken and cheap", "item broken cheap", Label::Positive);
        assert_eq!(outcome.label, Label::Negative);
        assert_eq!(outcome.fired_rules, vec!["negative_keywords"]);
    }

    #[test]
    fn test_positive_keyword_beats_negative_keyword() {
        let outcome = apply("Bad box, great product", "bad box great product", Label::Neutral);
        assert_eq!(outcome.label, Label::Positive);
        assert_eq!(outcome.fired_rules.len(), 2);
    }

    #[test]
    fn test_negation_beats_positive_keyword() {
        let outcome = apply(
            "Not great, I was expecting more",
            "great expect",
            Label::Positive,
        );
        assert_eq!(outcome.label, Label::Negative);
        assert_eq!(
            outcome.fired_rules,
            vec!["positive_keywords", "negation_patterns"]
        );
    }

    #[test]
    fn test_patterns_are_case_insensitive_on_raw_text() {
        let outcome = apply("NOT WORTH IT", "worth", Label::Positive);
        assert_eq!(outcome.label, Label::Negative);
    }

    #[test]
    fn test_empty_rule_set() {
        let engine = OverrideEngine::new(RuleSet::empty());
        let outcome = engine.apply(
            "terrible",
            &NormalizedText::from_normalized("terrible"),
            Label::Positive,
        );
        assert_eq!(outcome.label, Label::Positive);
    }

    #[test]
    fn test_custom_rule_order() {
        let rules = RuleSet::new(vec![
            OverrideRule::keywords("late_positive", ["okay"], Label::Positive),
            OverrideRule::keywords("late_neutral", ["okay"], Label::Neutral),
        ]);
        let outcome = OverrideEngine::new(rules).apply(
            "okay",
            &NormalizedText::from_normalized("okay"),
            Label::Negative,
        );
        assert_eq!(outcome.label, Label::Neutral);
    }
}
