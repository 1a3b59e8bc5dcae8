//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness with server timestamp
//! - `/metrics` : Prometheus text format
//! - fallback   : JSON 404
//! - panic guard: generic 500

use std::any::Any;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tasktrack_core::metrics::TEXT_FORMAT;

use crate::app_state::AppState;
use crate::error::internal_error_response;

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response()
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// `CatchPanicLayer` hook. The panic hook installed at startup has already
/// logged the location and backtrace; this records the payload and answers 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let msg = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(error = %msg, "Unhandled error");
    internal_error_response()
}
