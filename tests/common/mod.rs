//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use polarity::analysis::Normalizer;
use polarity::ml::classifier::ClassifierConfig;
use polarity::ml::dataset::{Dataset, ReviewSample};
use polarity::ml::label::Label;
use polarity::ml::vectorizer::{TfIdfVectorizer, VectorizerConfig};
use polarity::ml::TrainedArtifacts;
use polarity::sentiment::DecisionEngine;

/// A small labelled review corpus with every label represented.
pub const REVIEWS: &[(&str, Label)] = &[
    ("Sound quality is crisp and the bass is deep", Label::Positive),
    ("Battery lasts all week, very happy with it", Label::Positive),
    ("Fast shipping and the fit is just right", Label::Positive),
    ("My kids use this tablet every day and it still works", Label::Positive),
    ("Exactly as described, would buy again", Label::Positive),
    ("Comfortable headphones, clear sound, solid build", Label::Positive),
    ("The charger stopped working after two days", Label::Negative),
    ("Screen cracked within a week, asked for a refund", Label::Negative),
    ("Arrived late and the box was missing parts", Label::Negative),
    ("Battery drains overnight and the speaker crackles", Label::Negative),
    ("Customer support never answered my emails", Label::Negative),
    ("Returned it, the buttons stick and the app crashes", Label::Negative),
    ("It does the job, nothing special", Label::Neutral),
    ("Average tablet for the price", Label::Neutral),
    ("Okay sound, okay battery, okay screen", Label::Neutral),
    ("Works as expected, nothing more to say", Label::Neutral),
    ("Decent enough for checking email", Label::Neutral),
    ("Middle of the road speaker, neither loud nor quiet", Label::Neutral),
];

pub fn dataset() -> Dataset {
    Dataset::from_samples(
        REVIEWS
            .iter()
            .map(|(text, label)| ReviewSample::new(*text, *label))
            .collect(),
    )
}

/// Artifacts fitted on the whole corpus.
pub fn artifacts() -> TrainedArtifacts {
    let normalizer = Normalizer::new();
    let docs: Vec<String> = REVIEWS
        .iter()
        .map(|(text, _)| normalizer.normalize(text).unwrap().into_string())
        .collect();
    let labels: Vec<Label> = REVIEWS.iter().map(|(_, label)| *label).collect();

    let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default());
    let features = vectorizer.fit_transform(&docs).unwrap();
    let model = ClassifierConfig::default().fit(&features, &labels).unwrap();
    TrainedArtifacts::from_model(vectorizer, model).unwrap()
}

pub fn engine() -> DecisionEngine {
    DecisionEngine::new(artifacts())
}
