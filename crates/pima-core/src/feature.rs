//! The eight clinical inputs and the fixed-order vector the classifier consumes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::PredictError;

/// Number of inputs the classifier expects.
pub const FEATURE_COUNT: usize = 8;

/// A single clinical measurement, in model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    #[serde(rename = "BMI")]
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

/// Whether a feature is a whole-number count or a continuous measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Count,
    Continuous,
}

impl Feature {
    /// All features in the order the classifier consumes them.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Pregnancies,
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
        Feature::Insulin,
        Feature::Bmi,
        Feature::DiabetesPedigreeFunction,
        Feature::Age,
    ];

    /// The JSON key clients send for this feature.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Pregnancies => "Pregnancies",
            Feature::Glucose => "Glucose",
            Feature::BloodPressure => "BloodPressure",
            Feature::SkinThickness => "SkinThickness",
            Feature::Insulin => "Insulin",
            Feature::Bmi => "BMI",
            Feature::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
            Feature::Age => "Age",
        }
    }

    /// Position of this feature in a [`FeatureVector`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> FeatureKind {
        match self {
            Feature::Pregnancies | Feature::Age => FeatureKind::Count,
            _ => FeatureKind::Continuous,
        }
    }

    /// Plausible clinical range `(min, max)` used by form clients.
    ///
    /// Informational only: predictions are made for any numeric value.
    pub fn reference_range(self) -> (f64, f64) {
        match self {
            Feature::Pregnancies => (0.0, 20.0),
            Feature::Glucose => (0.0, 300.0),
            Feature::BloodPressure => (0.0, 200.0),
            Feature::SkinThickness => (0.0, 100.0),
            Feature::Insulin => (0.0, 900.0),
            Feature::Bmi => (0.0, 70.0),
            Feature::DiabetesPedigreeFunction => (0.0, 2.5),
            Feature::Age => (0.0, 120.0),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-order numeric input row for the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Decodes a raw request body, whatever its declared content type.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, PredictError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_json(&value)
    }

    /// Extracts the eight features from a JSON object.
    ///
    /// Every key is checked for presence before any value is type-checked,
    /// so a missing key wins over a mistyped one. Extra keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self, PredictError> {
        let Value::Object(map) = value else {
            return Err(PredictError::NotAnObject(json_kind(value)));
        };

        if let Some(missing) = Feature::ALL.into_iter().find(|f| !map.contains_key(f.name())) {
            return Err(PredictError::MissingFeature(missing));
        }

        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            values[feature.index()] = numeric_field(map, feature)?;
        }
        Ok(Self(values))
    }
}

fn numeric_field(map: &Map<String, Value>, feature: Feature) -> Result<f64, PredictError> {
    let value = &map[feature.name()];
    value.as_f64().ok_or(PredictError::InvalidFeature {
        feature,
        found: json_kind(value),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "Pregnancies": 6, "Glucose": 148, "BloodPressure": 72,
            "SkinThickness": 35, "Insulin": 0, "BMI": 33.6,
            "DiabetesPedigreeFunction": 0.627, "Age": 50
        })
    }

    #[test]
    fn test_feature_order_matches_index() {
        for (i, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_feature_serializes_as_request_key() {
        for feature in Feature::ALL {
            let encoded = serde_json::to_value(feature).unwrap();
            assert_eq!(encoded, Value::String(feature.name().to_string()));
        }
    }

    #[test]
    fn test_from_json_preserves_order() {
        let vector = FeatureVector::from_json(&sample()).unwrap();
        assert_eq!(
            vector.values(),
            &[6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]
        );
        assert_eq!(vector.get(Feature::Bmi), 33.6);
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let mut body = sample();
        body["Outcome"] = json!(1);
        body["note"] = json!("ignored");
        assert!(FeatureVector::from_json(&body).is_ok());
    }

    #[test]
    fn test_each_missing_key_is_reported() {
        for feature in Feature::ALL {
            let mut body = sample();
            body.as_object_mut().unwrap().remove(feature.name());
            let err = FeatureVector::from_json(&body).unwrap_err();
            assert_eq!(err, PredictError::MissingFeature(feature));
            assert_eq!(err.to_string(), format!("Missing feature: '{}'", feature.name()));
        }
    }

    #[test]
    fn test_first_missing_key_in_model_order_wins() {
        let mut body = sample();
        let map = body.as_object_mut().unwrap();
        map.remove("Age");
        map.remove("Insulin");
        let err = FeatureVector::from_json(&body).unwrap_err();
        assert_eq!(err, PredictError::MissingFeature(Feature::Insulin));
    }

    #[test]
    fn test_missing_key_reported_before_type_error() {
        let mut body = sample();
        body["Pregnancies"] = json!("six");
        body.as_object_mut().unwrap().remove("Glucose");
        let err = FeatureVector::from_json(&body).unwrap_err();
        assert_eq!(err, PredictError::MissingFeature(Feature::Glucose));
    }

    #[test]
    fn test_non_numeric_values_are_rejected() {
        for bad in [json!("148"), json!(null), json!(true), json!([148]), json!({"v": 1})] {
            let mut body = sample();
            body["Glucose"] = bad;
            let err = FeatureVector::from_json(&body).unwrap_err();
            assert!(matches!(
                err,
                PredictError::InvalidFeature { feature: Feature::Glucose, .. }
            ));
            assert!(!err.is_client_error());
        }
    }

    #[test]
    fn test_non_object_body() {
        let err = FeatureVector::from_json(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, PredictError::NotAnObject("an array"));
    }

    #[test]
    fn test_malformed_json_slice() {
        let err = FeatureVector::from_json_slice(b"{not json").unwrap_err();
        assert!(matches!(err, PredictError::MalformedBody(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_reference_ranges_are_ordered() {
        for feature in Feature::ALL {
            let (min, max) = feature.reference_range();
            assert!(min < max, "{feature}");
        }
    }
}
