//! Backend-local error type, converting into `podforge_core::Error` at the
//! crate boundary (the same per-crate-error-converts-into-core-error shape
//! used throughout this workspace).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("timeout")]
    Timeout,

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl LlmError {
    /// Non-retryable on HTTP-equivalent status 400/401/403; everything else,
    /// including timeouts, is retryable (spec §4.1).
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::Api(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return LlmError::Timeout;
        }
        if let Some(status) = err.status() {
            if matches!(status.as_u16(), 400 | 401 | 403) {
                return LlmError::Api(err.to_string());
            }
        }
        LlmError::Network(err.to_string())
    }
}

impl From<LlmError> for podforge_core::Error {
    fn from(err: LlmError) -> Self {
        podforge_core::Error::backend(err.to_string())
    }
}
