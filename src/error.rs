//! Error types for the Polarity library.
//!
//! All fallible operations return [`PolarityError`]. Three variants carry the
//! serving contract:
//!
//! - [`PolarityError::InvalidInput`]: the caller sent an empty or
//!   whitespace-only review. Recoverable, mapped to a client error.
//! - [`PolarityError::ArtifactLoad`]: trained artifacts are missing, corrupt or
//!   dimensionally incompatible. Fatal at startup.
//! - [`PolarityError::ContractViolation`]: a component was used before it was
//!   fitted or wired with mismatched artifacts. A programming error.
//!
//! # Examples
//!
//! ```
//! use polarity::error::{PolarityError, Result};
//!
//! fn check(review: &str) -> Result<()> {
//!     if review.trim().is_empty() {
//!         return Err(PolarityError::invalid_input("Empty review text"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check("   ").is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Polarity operations.
#[derive(Error, Debug)]
pub enum PolarityError {
    /// Review text was empty or whitespace-only.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Trained artifacts could not be loaded or are incompatible.
    #[error("Artifact load error: {0}")]
    ArtifactLoad(String),

    /// A component was used in violation of its contract (wiring bug).
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Configuration errors (bad rule files, invalid settings).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dataset ingestion errors.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Training errors (empty corpus, single class, ...).
    #[error("Training error: {0}")]
    Training(String),

    /// Analysis-related errors raised by custom analyzers.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Binary serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

}

/// Result type alias for operations that may fail with PolarityError.
pub type Result<T> = std::result::Result<T, PolarityError>;

impl PolarityError {
    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        PolarityError::InvalidInput(msg.into())
    }

    /// Create a new artifact load error.
    pub fn artifact_load<S: Into<String>>(msg: S) -> Self {
        PolarityError::ArtifactLoad(msg.into())
    }

    /// Create a new contract violation error.
    pub fn contract_violation<S: Into<String>>(msg: S) -> Self {
        PolarityError::ContractViolation(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        PolarityError::Config(msg.into())
    }

    /// Create a new dataset error.
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        PolarityError::Dataset(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        PolarityError::Training(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        PolarityError::Analysis(msg.into())
    }

    /// Whether the error is caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PolarityError::InvalidInput(_))
    }

    /// Whether the error means the process cannot (or must not) keep serving.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PolarityError::ArtifactLoad(_) | PolarityError::ContractViolation(_)
        )
    }
}

impl From<bincode::Error> for PolarityError {
    fn from(err: bincode::Error) -> Self {
        PolarityError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = PolarityError::invalid_input("Empty review text");
        assert_eq!(error.to_string(), "Invalid input: Empty review text");

        let error = PolarityError::artifact_load("vectorizer.bin not found");
        assert_eq!(
            error.to_string(),
            "Artifact load error: vectorizer.bin not found"
        );

        let error = PolarityError::contract_violation("transform before fit");
        assert_eq!(error.to_string(), "Contract violation: transform before fit");
    }

    #[test]
    fn test_error_classification() {
        assert!(PolarityError::invalid_input("x").is_client_error());
        assert!(!PolarityError::invalid_input("x").is_fatal());
        assert!(PolarityError::artifact_load("x").is_fatal());
        assert!(PolarityError::contract_violation("x").is_fatal());
        assert!(!PolarityError::config("x").is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = PolarityError::from(io_error);

        match error {
            PolarityError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
