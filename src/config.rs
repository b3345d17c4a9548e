//! Service configuration.
//!
//! A [`ServiceConfig`] can be read from a JSON file; every field has a
//! default, so a partial file (or none at all) is fine. The CLI applies its
//! flags and environment variables on top.
//!
//! ```json
//! {
//!   "server": {"host": "0.0.0.0", "port": 8080},
//!   "artifact_dir": "models",
//!   "rules_path": "rules.json"
//! }
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PolarityError, Result};
use crate::ml::artifacts::{
    ArtifactPaths, CLASSIFIER_FILE, DEFAULT_ARTIFACT_DIR, TrainedArtifacts, VECTORIZER_FILE,
};
use crate::sentiment::engine::DecisionEngine;
use crate::sentiment::rules::RuleSet;

/// Default listen address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Parse host and port into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                PolarityError::config(format!(
                    "invalid listen address {}:{}: {e}",
                    self.host, self.port
                ))
            })
    }
}

/// Everything needed to build and serve a [`DecisionEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    /// Directory holding the artifact files.
    pub artifact_dir: PathBuf,
    /// Vectorizer file; relative paths resolve against `artifact_dir`.
    pub vectorizer_file: PathBuf,
    /// Classifier file; relative paths resolve against `artifact_dir`.
    pub classifier_file: PathBuf,
    /// JSON override rules replacing the built-in ones.
    pub rules_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            vectorizer_file: PathBuf::from(VECTORIZER_FILE),
            classifier_file: PathBuf::from(CLASSIFIER_FILE),
            rules_path: None,
        }
    }
}

impl ServiceConfig {
    /// Read a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            PolarityError::config(format!("cannot read config {}: {e}", path.display()))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            PolarityError::config(format!("invalid config {}: {e}", path.display()))
        })
    }

    /// Resolved artifact file locations.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(
            self.artifact_dir.join(&self.vectorizer_file),
            self.artifact_dir.join(&self.classifier_file),
        )
    }

    /// The configured rule file, or the built-in rules.
    pub fn load_rules(&self) -> Result<RuleSet> {
        match &self.rules_path {
            Some(path) => RuleSet::load(path),
            None => Ok(RuleSet::default()),
        }
    }

    /// Load the artifacts and rules and assemble the engine.
    pub fn build_engine(&self) -> Result<DecisionEngine> {
        let artifacts = TrainedArtifacts::load(&self.artifact_paths())?;
        Ok(DecisionEngine::new(artifacts).with_rules(self.load_rules()?))
    }
}
