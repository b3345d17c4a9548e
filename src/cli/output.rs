//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, PolarityArgs};
use crate::error::Result;
use crate::ml::evaluation::ClassificationReport;
use crate::ml::label::Label;
use crate::ml::training::TrainingReport;
use crate::sentiment::engine::Decision;

/// Rendering of a result for people rather than programs.
pub trait HumanOutput {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// One normalized review.
#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeResult {
    pub review: String,
    pub normalized: String,
}

/// One classified review.
#[derive(Debug, Serialize)]
pub struct ClassifyResult {
    pub review: String,
    #[serde(flatten)]
    pub outcome: ClassifyOutcome,
}

/// Label, full decision, or the reason the review was rejected.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ClassifyOutcome {
    Label { sentiment: Label },
    Detailed { sentiment: Label, decision: Decision },
    Rejected { error: String },
}

/// Result of a training run.
#[derive(Debug, Serialize)]
pub struct TrainResult {
    /// Where the report was written; `None` on a dry run.
    pub report_path: Option<String>,
    pub artifact_dir: Option<String>,
    pub report: TrainingReport,
}

/// Result of evaluating the decision engine on a dataset.
#[derive(Debug, Serialize)]
pub struct EvaluateResult {
    pub samples: usize,
    pub overrides: bool,
    /// Reviews whose final label differs from the classifier's.
    pub overridden: usize,
    pub evaluation: ClassificationReport,
}

impl<T: HumanOutput> HumanOutput for Vec<T> {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        for item in self {
            item.write_human(out)?;
        }
        Ok(())
    }
}

impl HumanOutput for NormalizeResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.normalized)
    }
}

impl HumanOutput for ClassifyResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        match &self.outcome {
            ClassifyOutcome::Label { sentiment } => {
                writeln!(out, "{:<8}  {}", sentiment.as_str(), truncate(&self.review, 72))
            }
            ClassifyOutcome::Detailed { decision, .. } => {
                writeln!(out, "{}", self.review)?;
                writeln!(out, "  sentiment:   {}", decision.label)?;
                writeln!(out, "  classifier:  {}", decision.classifier_label)?;
                let scores: Vec<String> = Label::ALL
                    .iter()
                    .map(|l| format!("{}={:.4}", l, decision.scores[l.index()]))
                    .collect();
                writeln!(out, "  scores:      {}", scores.join(" "))?;
                writeln!(out, "  normalized:  {}", decision.normalized)?;
                if decision.fired_rules.is_empty() {
                    writeln!(out, "  rules:       -")
                } else {
                    writeln!(out, "  rules:       {}", decision.fired_rules.join(", "))
                }
            }
            ClassifyOutcome::Rejected { error } => {
                writeln!(out, "{:<8}  {}", "error", error)
            }
        }
    }
}

impl HumanOutput for TrainResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        let report = &self.report;
        writeln!(out, "classifier:      {}", report.classifier.kind())?;
        writeln!(out, "train / test:    {} / {}", report.train_size, report.test_size)?;
        writeln!(out, "vocabulary size: {}", report.vocabulary_size)?;
        if let Some(dir) = &self.artifact_dir {
            writeln!(out, "artifacts:       {dir}")?;
        }
        if let Some(path) = &self.report_path {
            writeln!(out, "report:          {path}")?;
        }
        writeln!(out)?;
        write!(out, "{}", report.evaluation)
    }
}

impl HumanOutput for EvaluateResult {
    fn write_human(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "samples:    {}", self.samples)?;
        if self.overrides {
            writeln!(out, "overridden: {}", self.overridden)?;
        } else {
            writeln!(out, "overrides:  disabled")?;
        }
        writeln!(out)?;
        write!(out, "{}", self.evaluation)
    }
}

/// Print a command result in the selected format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &PolarityArgs,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human => output_human(&mut out, message, result, args),
        OutputFormat::Json => output_json(&mut out, result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(
    out: &mut dyn Write,
    message: &str,
    result: &T,
    args: &PolarityArgs,
) -> Result<()> {
    if args.verbosity() > 1 {
        writeln!(out, "{message}")?;
        writeln!(out)?;
    }
    result.write_human(out)?;
    out.flush()?;
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(out: &mut dyn Write, result: &T, args: &PolarityArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    writeln!(out, "{json}")?;
    out.flush()?;
    Ok(())
}

/// Shorten text to at most `max` characters for one-line display.
fn truncate(text: &str, max: usize) -> String {
    let single_line: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max {
        single_line
    } else {
        let cut: String = single_line.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
