use pima_core::{Diagnosis, FeatureVector, PredictError};
use tracing::debug;

use crate::state::ServerState;

/// Decodes a raw request body and runs it through the classifier.
pub fn diagnose(state: &ServerState, body: &[u8]) -> Result<Diagnosis, PredictError> {
    let features = FeatureVector::from_json_slice(body)?;
    let diagnosis = state.classifier.diagnose(&features)?;
    debug!(model = %state.model_name, ?features, %diagnosis, "prediction complete");
    Ok(diagnosis)
}
