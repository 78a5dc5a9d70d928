//! Logistic regression with an optional standard scaler in front.

use pima_core::{FeatureVector, PredictError, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

use crate::ModelError;

type Row = [f64; FEATURE_COUNT];

fn default_threshold() -> f64 {
    0.5
}

/// Per-feature `(x - mean) / scale` applied before the linear term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StandardScaler {
    pub(crate) mean: Row,
    pub(crate) scale: Row,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LogisticRegression {
    #[serde(default)]
    pub(crate) scaler: Option<StandardScaler>,
    pub(crate) coefficients: Row,
    pub(crate) intercept: f64,
    /// Minimum positive-class probability for a class `1` prediction.
    #[serde(default = "default_threshold")]
    pub(crate) threshold: f64,
}

impl LogisticRegression {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        check_finite("coefficients", &self.coefficients)?;
        if !self.intercept.is_finite() {
            return Err(ModelError::Invalid("intercept must be finite".into()));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(ModelError::Invalid(format!(
                "threshold must be in (0, 1), got {}",
                self.threshold
            )));
        }
        if let Some(scaler) = &self.scaler {
            check_finite("scaler.mean", &scaler.mean)?;
            check_finite("scaler.scale", &scaler.scale)?;
            if scaler.scale.iter().any(|s| *s == 0.0) {
                return Err(ModelError::Invalid("scaler.scale contains zero".into()));
            }
        }
        Ok(())
    }

    /// Raw linear score (log-odds of the positive class).
    pub(crate) fn decision_function(&self, features: &FeatureVector) -> f64 {
        let x = features.values();
        let mut z = self.intercept;
        for i in 0..FEATURE_COUNT {
            let v = match &self.scaler {
                Some(s) => (x[i] - s.mean[i]) / s.scale[i],
                None => x[i],
            };
            z += v * self.coefficients[i];
        }
        z
    }

    pub(crate) fn probability(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        let z = self.decision_function(features);
        if z.is_nan() {
            return Err(PredictError::Inference(
                "decision function is not a number".into(),
            ));
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }

    pub(crate) fn predict(&self, features: &FeatureVector) -> Result<i64, PredictError> {
        let p = self.probability(features)?;
        Ok(i64::from(p >= self.threshold))
    }
}

fn check_finite(field: &str, row: &Row) -> Result<(), ModelError> {
    if row.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::Invalid(format!("{field} contains a non-finite value")));
    }
    Ok(())
}
