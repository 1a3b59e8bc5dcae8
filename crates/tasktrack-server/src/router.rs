//! Axum router wiring.
//!
//! Layer order (outermost first): CORS → request instrumentation → panic
//! guard → handler. Instrumentation sits outside the guard so a panicking
//! handler is still logged and observed as a 500.

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

use crate::{app_state::AppState, obs, ops, tasks::handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/api/tasks/:id",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .fallback(ops::not_found)
        .layer(CatchPanicLayer::custom(ops::handle_panic))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::middleware::track_requests,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
