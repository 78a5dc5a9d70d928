//! HTTP server for the pima diabetes classifier.
//!
//! [`router`] wires the handlers to a shared [`ServerState`]; the binary in
//! `main.rs` loads configuration and the model artifact, then serves it.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod services;
pub mod state;

pub use state::ServerState;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{Request, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

/// Largest `/predict` body the server will buffer. Extra keys are ignored
/// rather than rejected, so this sits well above any real feature object.
pub const PREDICT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Builds the application router around an already-loaded classifier.
pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route(
            "/predict",
            post(handlers::predict::predict).layer(DefaultBodyLimit::max(PREDICT_BODY_LIMIT)),
        )
        .route("/features", get(handlers::features::list))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}
