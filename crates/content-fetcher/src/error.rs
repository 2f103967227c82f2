//! Crate-local error type, converting into `podforge_core::Error` at the
//! boundary (same per-crate-error-converts-into-core-error shape used
//! throughout this workspace).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("source not found: {0}")]
    NotFound(String),

    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("network error fetching {0}")]
    Network(String),

    #[error("unsupported source scheme: {0}")]
    UnsupportedScheme(String),
}

impl From<FetchError> for podforge_core::Error {
    fn from(err: FetchError) -> Self {
        podforge_core::Error::internal(format!("content fetch failed: {err}"))
    }
}
