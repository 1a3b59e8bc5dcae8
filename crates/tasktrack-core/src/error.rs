//! Shared error type across tasktrack crates.

use thiserror::Error;

use crate::metrics::MetricsError;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request body.
    BadRequest,
    /// Requested resource does not exist.
    NotFound,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TaskTrackError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum TaskTrackError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("metrics: {0}")]
    Metrics(#[from] MetricsError),
    #[error("internal: {0}")]
    Internal(String),
}

impl TaskTrackError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TaskTrackError::BadRequest(_) => ClientCode::BadRequest,
            TaskTrackError::NotFound(_) => ClientCode::NotFound,
            TaskTrackError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            TaskTrackError::Metrics(_) | TaskTrackError::Internal(_) => ClientCode::Internal,
        }
    }
}
