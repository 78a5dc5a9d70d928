use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::{extract::State, Json};
use tracing::{error, warn};

use crate::dto::PredictResponse;
use crate::error::AppError;
use crate::services::prediction;
use crate::ServerState;

/// POST /predict - Classify one set of clinical measurements.
///
/// The body is read as raw bytes and decoded as JSON whatever the declared
/// content type, so clients that omit the header still get a prediction.
/// A body that cannot be read (for instance one over
/// [`PREDICT_BODY_LIMIT`](crate::PREDICT_BODY_LIMIT)) is a JSON 500 like any
/// other failure.
pub async fn predict(
    State(state): State<Arc<ServerState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let body = body.map_err(|rejection| {
        error!("Failed to read prediction request body: {}", rejection);
        AppError::Internal(rejection.body_text())
    })?;

    let diagnosis = prediction::diagnose(&state, &body).map_err(|e| {
        if e.is_client_error() {
            warn!("Rejected prediction request: {}", e);
        } else {
            error!("Prediction failed: {}", e);
        }
        AppError::from(e)
    })?;

    Ok(Json(PredictResponse { prediction: diagnosis }))
}
