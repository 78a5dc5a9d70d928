//! Classifier artifact loading and inference.
//!
//! An artifact is a JSON document with optional metadata and a `model`
//! object tagged by `kind`:
//!
//! ```json
//! {
//!   "name": "pima-logreg",
//!   "model": {
//!     "kind": "logistic_regression",
//!     "coefficients": [0.39, 1.11, -0.25, 0.01, -0.14, 0.70, 0.31, 0.17],
//!     "intercept": -0.87
//!   }
//! }
//! ```
//!
//! Artifacts are validated once when loaded. The model internals are private
//! to this crate, so a [`ModelArtifact`] can only come from [`ModelArtifact::load`]
//! or [`ModelArtifact::from_json_str`]; one that exists is safe to share across
//! threads and never changes.

mod forest;
mod logistic;

use forest::DecisionForest;
use logistic::LogisticRegression;

use std::fs;
use std::path::{Path, PathBuf};

use pima_core::{Classifier, FeatureVector, PredictError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from loading a classifier artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    Invalid(String),
}

/// The supported model families.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum Model {
    LogisticRegression(LogisticRegression),
    DecisionForest(DecisionForest),
}

impl Model {
    fn validate(&self) -> Result<(), ModelError> {
        match self {
            Model::LogisticRegression(m) => m.validate(),
            Model::DecisionForest(m) => m.validate(),
        }
    }
}

/// A validated, immutable classifier loaded from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    model: Model,
}

impl ModelArtifact {
    /// Reads and validates an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact = Self::from_json_str(&content)?;
        debug!("Loaded {} artifact from {}", artifact.kind(), path.display());
        Ok(artifact)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(content)?;
        artifact.model.validate()?;
        Ok(artifact)
    }

    /// Display name, falling back to the model family.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.kind())
    }
}

impl Classifier for ModelArtifact {
    fn kind(&self) -> &'static str {
        match self.model {
            Model::LogisticRegression(_) => "logistic_regression",
            Model::DecisionForest(_) => "decision_forest",
        }
    }

    fn predict(&self, features: &FeatureVector) -> Result<i64, PredictError> {
        match &self.model {
            Model::LogisticRegression(m) => m.predict(features),
            Model::DecisionForest(m) => m.predict(features),
        }
    }
}
