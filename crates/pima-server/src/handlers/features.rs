use axum::Json;
use pima_core::Feature;

use crate::dto::FeatureInfo;

/// GET /features - The model inputs, in the order the classifier consumes them.
pub async fn list() -> Json<Vec<FeatureInfo>> {
    Json(Feature::ALL.into_iter().map(FeatureInfo::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pima_core::FeatureKind;

    #[tokio::test]
    async fn test_lists_features_in_model_order() {
        let Json(features) = list().await;
        let names: Vec<_> = features.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                "Pregnancies",
                "Glucose",
                "BloodPressure",
                "SkinThickness",
                "Insulin",
                "BMI",
                "DiabetesPedigreeFunction",
                "Age",
            ]
        );
        assert_eq!(features[0].kind, FeatureKind::Count);
        assert_eq!(features[5].kind, FeatureKind::Continuous);
        assert_eq!(features[6].max, 2.5);
    }

    #[test]
    fn test_feature_info_serialization() {
        let info = serde_json::to_value(FeatureInfo::from(Feature::Age)).unwrap();
        assert_eq!(
            info,
            serde_json::json!({ "name": "Age", "kind": "count", "min": 0.0, "max": 120.0 })
        );
    }
}
