//! Per-request instrumentation: duration histogram sample + one JSON log line.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, MatchedPath, State},
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;
use crate::obs::metrics::RequestSample;

/// Runs outside the panic guard, so panicking handlers are still recorded as 500s.
pub async fn track_requests(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_default();

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    let status = response.status().as_u16();
    let duration_ms = elapsed.as_millis() as u64;
    tracing::info!(
        method = %method,
        path = %path,
        statusCode = status,
        duration = duration_ms,
        userAgent = %user_agent,
        ip = %ip,
        "HTTP Request"
    );

    state.metrics().observe_request(&RequestSample {
        method,
        route,
        status,
        elapsed,
    });

    response
}
