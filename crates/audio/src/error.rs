//! Crate-local error type, converting into `podforge_core::Error` at the
//! boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("speech synthesis failed for utterance {index}: {message}")]
    Synthesis { index: u32, message: String },

    #[error("io error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ffmpeg concat failed: {0}")]
    Concat(String),

    #[error("ffprobe failed: {0}")]
    Probe(String),

    #[error("external tool not found: {0}")]
    ToolMissing(String),
}

impl From<AudioError> for podforge_core::Error {
    fn from(err: AudioError) -> Self {
        podforge_core::Error::audio(err.to_string())
    }
}
