use pima_core::{Diagnosis, Feature, FeatureKind};
use serde::Serialize;

// === HTTP DTOs ===

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: Diagnosis,
}

#[derive(Debug, Serialize)]
pub struct FeatureInfo {
    pub name: &'static str,
    pub kind: FeatureKind,
    pub min: f64,
    pub max: f64,
}

impl From<Feature> for FeatureInfo {
    fn from(feature: Feature) -> Self {
        let (min, max) = feature.reference_range();
        Self {
            name: feature.name(),
            kind: feature.kind(),
            min,
            max,
        }
    }
}
