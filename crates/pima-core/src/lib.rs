//! Core domain types and error definitions for pima.
//!
//! This crate provides the types shared between the model and the server:
//!
//! - [`Feature`] and [`FeatureVector`] — The eight clinical inputs, in model order
//! - [`Diagnosis`] — The human-readable label returned to clients
//! - [`Classifier`] — The inference seam implemented by model artifacts
//! - [`PredictError`] — Classified failures of a single prediction
//!
//! # Example
//!
//! ```rust
//! use pima_core::{Diagnosis, FeatureVector};
//!
//! let body = br#"{"Pregnancies": 6, "Glucose": 148, "BloodPressure": 72,
//!     "SkinThickness": 35, "Insulin": 0, "BMI": 33.6,
//!     "DiabetesPedigreeFunction": 0.627, "Age": 50}"#;
//!
//! let features = FeatureVector::from_json_slice(body).unwrap();
//! assert_eq!(features.values()[1], 148.0);
//! assert_eq!(Diagnosis::from_class(1).label(), "Diabetic");
//! ```

mod feature;

pub use feature::{Feature, FeatureKind, FeatureVector, FEATURE_COUNT};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Class value the classifier emits for a diabetic prediction.
pub const POSITIVE_CLASS: i64 = 1;

/// Errors that can occur while turning a request into a diagnosis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// A required key is absent from the request object.
    #[error("Missing feature: '{0}'")]
    MissingFeature(Feature),

    /// The request body is not valid JSON.
    #[error("Failed to decode JSON object: {0}")]
    MalformedBody(String),

    /// The request body is valid JSON but not an object.
    #[error("Request body must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// A required key is present but its value is not a number.
    #[error("Feature '{feature}' must be a number, found {found}")]
    InvalidFeature {
        feature: Feature,
        found: &'static str,
    },

    /// The classifier could not produce a class.
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    /// True for errors caused by an incomplete request rather than a failure
    /// while processing it.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::MissingFeature(_))
    }
}

impl From<serde_json::Error> for PredictError {
    fn from(err: serde_json::Error) -> Self {
        PredictError::MalformedBody(err.to_string())
    }
}

/// Outcome of a prediction, as shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    #[serde(rename = "Diabetic")]
    Diabetic,
    #[serde(rename = "Non-Diabetic")]
    NonDiabetic,
}

impl Diagnosis {
    /// Maps a raw classifier output to a label. Only [`POSITIVE_CLASS`] is diabetic.
    pub fn from_class(class: i64) -> Self {
        if class == POSITIVE_CLASS {
            Diagnosis::Diabetic
        } else {
            Diagnosis::NonDiabetic
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Diagnosis::Diabetic => "Diabetic",
            Diagnosis::NonDiabetic => "Non-Diabetic",
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A pre-trained binary classifier over a [`FeatureVector`].
///
/// Implementations are immutable after construction and shared across
/// requests, hence `Send + Sync` and `&self`.
pub trait Classifier: Send + Sync {
    /// Short name of the model family, used in logs.
    fn kind(&self) -> &'static str;

    /// Returns the predicted class value for one row.
    fn predict(&self, features: &FeatureVector) -> Result<i64, PredictError>;

    /// Predicts and maps the class to a [`Diagnosis`].
    fn diagnose(&self, features: &FeatureVector) -> Result<Diagnosis, PredictError> {
        self.predict(features).map(Diagnosis::from_class)
    }
}
