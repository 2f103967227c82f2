//! Server-local error variants, converting into an HTTP status the way the
//! teacher's `ServerError` converts into `axum::http::StatusCode`.

use axum::http::StatusCode;
use podforge_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("job {0} not found")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Core(#[from] podforge_core::Error),
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Core(core_err) => status_for_kind(core_err.kind),
        }
    }
}

/// Maps the job-API error taxonomy (spec §7) onto HTTP status: constraint
/// violations and cancellation are caller-facing 4xx, everything the
/// pipeline itself could not recover from is a 5xx.
fn status_for_kind(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Cancelled => StatusCode::CONFLICT,
        ErrorKind::Agent | ErrorKind::Backend | ErrorKind::Audio | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
