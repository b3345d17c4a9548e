//! Command implementations for the polarity CLI.

use std::io::{self, BufRead};
use std::path::Path;

use crate::analysis::normalizer::Normalizer;
use crate::api::{self, handlers::AppState};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ServiceConfig;
use crate::error::{PolarityError, Result};
use crate::ml::artifacts::{ArtifactPaths, TrainedArtifacts};
use crate::ml::classifier::ClassifierConfig;
use crate::ml::dataset::Dataset;
use crate::ml::evaluation::ClassificationReport;
use crate::ml::label::Label;
use crate::ml::training::{Trainer, TrainingConfig};
use crate::ml::vectorizer::VectorizerConfig;
use crate::sentiment::engine::DecisionEngine;
use crate::sentiment::rules::RuleSet;

/// Execute a CLI command.
pub fn execute_command(args: PolarityArgs) -> Result<()> {
    match &args.command {
        Command::Normalize(normalize_args) => normalize(normalize_args, &args),
        Command::Classify(classify_args) => classify(classify_args, &args),
        Command::Train(train_args) => train(train_args, &args),
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args, &args),
        Command::Serve(serve_args) => serve(serve_args),
    }
}

/// Reviews given on the command line, or stdin lines when there are none.
fn read_reviews(reviews: &[String]) -> Result<Vec<String>> {
    if !reviews.is_empty() {
        return Ok(reviews.to_vec());
    }
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        lines.push(line?);
    }
    Ok(lines)
}

fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => RuleSet::load(path),
        None => Ok(RuleSet::default()),
    }
}

fn load_engine(paths: &ArtifactPaths, rules: RuleSet) -> Result<DecisionEngine> {
    let artifacts = TrainedArtifacts::load(paths)?;
    Ok(DecisionEngine::new(artifacts).with_rules(rules))
}

/// Print the normalized form of each review.
fn normalize(args: &NormalizeArgs, cli_args: &PolarityArgs) -> Result<()> {
    let normalizer = Normalizer::new();
    let results = read_reviews(&args.reviews)?
        .into_iter()
        .map(|review| {
            let normalized = normalizer.normalize(&review)?.into_string();
            Ok(NormalizeResult { review, normalized })
        })
        .collect::<Result<Vec<_>>>()?;

    output_result(
        &format!("Normalized {} reviews", results.len()),
        &results,
        cli_args,
    )
}

/// Classify each review with the full decision engine.
fn classify(args: &ClassifyArgs, cli_args: &PolarityArgs) -> Result<()> {
    let engine = load_engine(&args.artifacts.paths(), load_rules(args.rules.as_deref())?)?;
    let reviews = read_reviews(&args.reviews)?;

    let results: Vec<ClassifyResult> = reviews
        .into_iter()
        .map(|review| {
            let outcome = match engine.classify_detailed(&review) {
                Ok(decision) if args.detailed => ClassifyOutcome::Detailed {
                    sentiment: decision.label,
                    decision,
                },
                Ok(decision) => ClassifyOutcome::Label {
                    sentiment: decision.label,
                },
                Err(e) if e.is_client_error() => ClassifyOutcome::Rejected {
                    error: client_message(e),
                },
                Err(e) => return Err(e),
            };
            Ok(ClassifyResult { review, outcome })
        })
        .collect::<Result<_>>()?;

    output_result(
        &format!("Classified {} reviews", results.len()),
        &results,
        cli_args,
    )
}

fn client_message(err: PolarityError) -> String {
    match err {
        PolarityError::InvalidInput(msg) => msg,
        other => other.to_string(),
    }
}

fn training_config(args: &TrainArgs) -> TrainingConfig {
    let mut classifier = args.classifier.default_config();
    match &mut classifier {
        ClassifierConfig::LogisticRegression(params) => {
            if let Some(c) = args.c {
                params.c = c;
            }
            if let Some(max_iter) = args.max_iter {
                params.max_iter = max_iter;
            }
        }
        ClassifierConfig::NaiveBayes(params) => {
            if let Some(alpha) = args.alpha {
                params.alpha = alpha;
            }
        }
        ClassifierConfig::NearestCentroid => {}
    }

    TrainingConfig {
        test_size: args.test_size,
        seed: args.seed,
        vectorizer: VectorizerConfig {
            max_features: Some(args.max_features),
            max_n: args.max_ngram,
            ..Default::default()
        },
        classifier,
    }
}

/// Train, evaluate and save a model.
fn train(args: &TrainArgs, cli_args: &PolarityArgs) -> Result<()> {
    let dataset = Dataset::load(&args.data)?;
    let counts = dataset.label_counts();
    tracing::info!(
        samples = dataset.len(),
        negative = counts[Label::Negative.index()],
        neutral = counts[Label::Neutral.index()],
        positive = counts[Label::Positive.index()],
        "loaded training data"
    );

    let outcome = Trainer::new(training_config(args)).train(&dataset)?;

    let (report_path, artifact_dir) = if args.dry_run {
        (None, None)
    } else {
        let paths = ArtifactPaths::in_dir(&args.artifact_dir);
        let report_path = outcome.save(&paths, &args.reports_dir)?;
        (
            Some(report_path.display().to_string()),
            Some(args.artifact_dir.display().to_string()),
        )
    };

    output_result(
        "Training complete",
        &TrainResult {
            report_path,
            artifact_dir,
            report: outcome.report,
        },
        cli_args,
    )
}

/// Evaluate saved artifacts, with or without overrides, on a labelled dataset.
fn evaluate(args: &EvaluateArgs, cli_args: &PolarityArgs) -> Result<()> {
    let rules = if args.no_overrides {
        RuleSet::empty()
    } else {
        load_rules(args.rules.as_deref())?
    };
    let engine = load_engine(&args.artifacts.paths(), rules)?;
    let dataset = Dataset::load(&args.data)?;
    if dataset.is_empty() {
        return Err(PolarityError::dataset("no labelled reviews to evaluate"));
    }

    let mut truth = Vec::with_capacity(dataset.len());
    let mut predicted = Vec::with_capacity(dataset.len());
    let mut overridden = 0;
    let mut skipped = 0;
    for sample in dataset.samples() {
        let decision = match engine.classify_detailed(&sample.text) {
            Ok(decision) => decision,
            Err(e) if e.is_client_error() => {
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        if decision.label != decision.classifier_label {
            overridden += 1;
        }
        truth.push(sample.label);
        predicted.push(decision.label);
    }

    if skipped > 0 {
        tracing::warn!(skipped, "skipped empty reviews");
    }
    let evaluation = ClassificationReport::new(&truth, &predicted)?;
    tracing::info!(accuracy = evaluation.accuracy, overridden, "evaluated decision engine");

    output_result(
        "Evaluation complete",
        &EvaluateResult {
            samples: truth.len(),
            overrides: !args.no_overrides,
            overridden,
            evaluation,
        },
        cli_args,
    )
}

/// Resolve the service configuration from file, environment and flags.
pub fn service_config(args: &ServeArgs) -> Result<ServiceConfig> {
    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = &args.artifact_dir {
        config.artifact_dir = dir.clone();
    }
    if let Some(rules) = &args.rules {
        config.rules_path = Some(rules.clone());
    }
    Ok(config)
}

/// Load the engine and serve the HTTP API.
fn serve(args: &ServeArgs) -> Result<()> {
    let config = service_config(args)?;
    let engine = config.build_engine()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(api::serve(AppState::new(engine), &config.server))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn train_args(extra: &[&str]) -> TrainArgs {
        let mut argv = vec!["polarity", "train", "data.csv"];
        argv.extend_from_slice(extra);
        match PolarityArgs::try_parse_from(argv).unwrap().command {
            Command::Train(args) => args,
            _ => panic!("expected train"),
        }
    }

    #[test]
    fn test_training_config_overrides() {
        let config = training_config(&train_args(&["-C", "0.5", "--max-iter", "50"]));
        match config.classifier {
            ClassifierConfig::LogisticRegression(params) => {
                assert_eq!(params.c, 0.5);
                assert_eq!(params.max_iter, 50);
            }
            other => panic!("unexpected {other:?}"),
        }

        let config = training_config(&train_args(&["-c", "naive-bayes", "--alpha", "0.1"]));
        match config.classifier {
            ClassifierConfig::NaiveBayes(params) => assert_eq!(params.alpha, 0.1),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(config.vectorizer.max_n, 2);
    }

    #[test]
    fn test_service_config_flags_win() {
        let args = ServeArgs {
            config: None,
            host: Some("0.0.0.0".to_string()),
            port: Some(8080),
            artifact_dir: Some(PathBuf::from("out")),
            rules: None,
        };
        let config = service_config(&args).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.artifact_paths(), ArtifactPaths::in_dir("out"));
    }

    #[test]
    fn test_client_message() {
        assert_eq!(
            client_message(PolarityError::invalid_input("Empty review text")),
            "Empty review text"
        );
    }
}
