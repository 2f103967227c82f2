//! Workspace-level error type
//!
//! Every crate defines its own `thiserror` error enum for its own concerns
//! and converts into this one at the boundary, the way each voice-agent
//! crate converted its error into `voice_agent_core::Error`.

use thiserror::Error;

/// Stable error kind surfaced to API callers (spec §7). Never exposes
/// language-specific type names or stack traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Brief violated an enumerated constraint; rejected synchronously.
    Validation,
    /// A pipeline stage exhausted retries or produced structurally missing content.
    Agent,
    /// Upstream model/TTS service unreachable or returned a non-retryable error.
    Backend,
    /// Audio concatenation or probe failed.
    Audio,
    /// User-requested termination observed at a stage boundary.
    Cancelled,
    /// Invariant violation; fatal to the job but not to the process.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Agent => "agent",
            ErrorKind::Backend => "backend",
            ErrorKind::Audio => "audio",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Workspace error: a stable kind plus a human-readable message and the
/// stage that raised it, if any.
#[derive(Error, Debug, Clone)]
#[error("{kind:?}: {message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub stage: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stage: None,
        }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn agent(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Agent, message).with_stage(stage)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Backend, message)
    }

    pub fn audio(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Audio, message)
    }

    pub fn cancelled(stage: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, "job cancelled at stage boundary").with_stage(stage)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
