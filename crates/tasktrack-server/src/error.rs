//! HTTP mapping of `TaskTrackError`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use tasktrack_core::error::{ClientCode, TaskTrackError};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Handler error; internal details are logged, never sent to the caller.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub TaskTrackError);

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(TaskTrackError::BadRequest(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(TaskTrackError::NotFound(msg.into()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let (status, message) = match self.0 {
            TaskTrackError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            TaskTrackError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            other => {
                tracing::error!(error = %other, "Unhandled error");
                return internal_error_response();
            }
        };

        (status, Json(json!({ "error": message, "code": code.as_str() }))).into_response()
    }
}

/// Generic 500 shared by handler errors and the panic guard.
pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "code": ClientCode::Internal.as_str()
        })),
    )
        .into_response()
}
