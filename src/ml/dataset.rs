//! Labelled review datasets.
//!
//! Reviews are read from CSV exports whose column names vary between
//! sources. The first matching text column and the first matching rating
//! column are used; a star rating becomes a label through
//! [`Label::from_rating`]. Files that already carry a `sentiment` column and
//! no rating are read as-is. Rows with an empty text or a missing or
//! unparsable rating are dropped. JSON arrays of `{"text", "label"}` objects
//! are accepted too.
//!
//! # Examples
//!
//! ```
//! use polarity::ml::dataset::Dataset;
//! use polarity::ml::label::Label;
//!
//! let csv = "reviewText,overall\nLoved it,5\nMeh,3\nBroke in a day,1\n";
//! let dataset = Dataset::from_csv_reader(csv.as_bytes(), "inline").unwrap();
//!
//! assert_eq!(dataset.len(), 3);
//! assert_eq!(dataset.samples()[0].label, Label::Positive);
//! assert_eq!(dataset.samples()[2].label, Label::Negative);
//! ```

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PolarityError, Result};
use crate::ml::label::Label;

/// Review text column names, in order of preference.
pub const TEXT_COLUMNS: &[&str] = &["reviews.text", "reviewText", "reviews_body", "text", "review_text"];

/// Star rating column names, in order of preference.
pub const RATING_COLUMNS: &[&str] = &["reviews.rating", "overall", "rating", "stars"];

/// Column holding an explicit label.
pub const LABEL_COLUMN: &str = "sentiment";

/// A review with its sentiment label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSample {
    /// Raw review text.
    #[serde(alias = "review")]
    pub text: String,
    /// Sentiment label.
    #[serde(alias = "sentiment")]
    pub label: Label,
}

impl ReviewSample {
    pub fn new<S: Into<String>>(text: S, label: Label) -> Self {
        ReviewSample {
            text: text.into(),
            label,
        }
    }
}

enum LabelSource {
    Rating(usize),
    Label(usize),
}

/// An ordered collection of labelled reviews.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<ReviewSample>,
}

impl Dataset {
    /// Wrap existing samples.
    pub fn from_samples(samples: Vec<ReviewSample>) -> Self {
        Dataset { samples }
    }

    /// Read a CSV stream with a header row. `source` names the stream in errors.
    pub fn from_csv_reader<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let find = |candidates: &[&str]| {
            candidates
                .iter()
                .find_map(|name| headers.iter().position(|h| h.trim() == *name))
        };

        let text_idx = find(TEXT_COLUMNS).ok_or_else(|| {
            PolarityError::dataset(format!("{source}: no review text column found"))
        })?;
        let label_source = match find(RATING_COLUMNS) {
            Some(idx) => LabelSource::Rating(idx),
            None => match find(&[LABEL_COLUMN]) {
                Some(idx) => LabelSource::Label(idx),
                None => {
                    return Err(PolarityError::dataset(format!(
                        "{source}: no rating or sentiment column found"
                    )));
                }
            },
        };

        let mut samples = Vec::new();
        let mut skipped = 0usize;
        for record in csv_reader.records() {
            let record = record?;
            let text = record.get(text_idx).unwrap_or("");
            if text.trim().is_empty() {
                skipped += 1;
                continue;
            }

            let label = match label_source {
                LabelSource::Rating(idx) => record
                    .get(idx)
                    .and_then(|r| r.trim().parse::<f64>().ok())
                    .filter(|r| r.is_finite())
                    .map(Label::from_rating),
                LabelSource::Label(idx) => record.get(idx).and_then(|l| l.parse::<Label>().ok()),
            };

            match label {
                Some(label) => samples.push(ReviewSample::new(text, label)),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(source, skipped, "dropped rows with missing text or label");
        }
        tracing::debug!(source, rows = samples.len(), "read review csv");

        Ok(Dataset { samples })
    }

    /// Read one CSV file.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Read a JSON array of samples.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let samples: Vec<ReviewSample> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Dataset { samples })
    }

    /// Read every `.csv` file in a directory, in file name order.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "csv"))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(PolarityError::dataset(format!(
                "no csv files in {}",
                dir.display()
            )));
        }

        let mut dataset = Dataset::default();
        for file in &files {
            dataset.extend(Self::load_csv(file)?);
        }
        tracing::info!(
            files = files.len(),
            rows = dataset.len(),
            dir = %dir.display(),
            "loaded review dataset"
        );
        Ok(dataset)
    }

    /// Read a directory of CSV files, a CSV file or a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            return Self::load_dir(path);
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::load_json(path),
            Some("csv") => Self::load_csv(path),
            _ => Err(PolarityError::dataset(format!(
                "unsupported dataset file: {}",
                path.display()
            ))),
        }
    }

    /// Append the samples of another dataset.
    pub fn extend(&mut self, other: Dataset) {
        self.samples.extend(other.samples);
    }

    pub fn samples(&self) -> &[ReviewSample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<ReviewSample> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples per label, indexed by [`Label::index`].
    pub fn label_counts(&self) -> [usize; Label::COUNT] {
        let mut counts = [0; Label::COUNT];
        for sample in &self.samples {
            counts[sample.label.index()] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_column_preference() {
        let csv = "text,reviews.text,stars,reviews.rating\nwrong,right,1,5\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes(), "test").unwrap();
        assert_eq!(dataset.samples()[0].text, "right");
        assert_eq!(dataset.samples()[0].label, Label::Positive);
    }

    #[test]
    fn test_rows_dropped() {
        let csv = "reviewText,overall\n,5\ngood,\nok,abc\nfine,3\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes(), "test").unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.samples()[0], ReviewSample::new("fine", Label::Neutral));
    }

    #[test]
    fn test_sentiment_column() {
        let csv = "review_text,sentiment\ngreat,positive\nbad,negative\n";
        let dataset = Dataset::from_csv_reader(csv.as_bytes(), "test").unwrap();
        assert_eq!(dataset.label_counts(), [1, 0, 1]);
    }

    #[test]
    fn test_missing_columns() {
        let err = Dataset::from_csv_reader("title,stars\nx,5\n".as_bytes(), "test").unwrap_err();
        assert!(matches!(err, PolarityError::Dataset(_)));
        let err = Dataset::from_csv_reader("text,title\nx,y\n".as_bytes(), "test").unwrap_err();
        assert!(matches!(err, PolarityError::Dataset(_)));
    }

    #[test]
    fn test_load_dir_and_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.csv"), "text,rating\nsecond,1\n").unwrap();
        fs::write(dir.path().join("a.csv"), "reviewText,overall\nfirst,5\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let dataset = Dataset::load(dir.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.samples()[0].text, "first");
        assert_eq!(dataset.samples()[1].label, Label::Negative);

        let json_path = dir.path().join("samples.json");
        let mut file = File::create(&json_path).unwrap();
        write!(file, r#"[{{"text": "works", "label": "positive"}}, {{"review": "meh", "sentiment": "neutral"}}]"#).unwrap();
        drop(file);
        let dataset = Dataset::load(&json_path).unwrap();
        assert_eq!(dataset.label_counts(), [0, 1, 1]);
    }

    #[test]
    fn test_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Dataset::load_dir(dir.path()).is_err());
    }
}
