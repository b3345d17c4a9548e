//! Sentiment decisions: the classifier label refined by override rules.
//!
//! - [`rules`] - Override rules and rule files
//! - [`override_engine`] - Applies rules to a classifier label
//! - [`engine`] - The end-to-end [`DecisionEngine`]

pub mod engine;
pub mod override_engine;
pub mod rules;

pub use engine::{Decision, DecisionEngine};
pub use override_engine::{OverrideEngine, OverrideOutcome};
pub use rules::{OverrideRule, RuleMatcher, RuleSet, RuleSpec};
