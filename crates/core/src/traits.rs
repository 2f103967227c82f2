//! Trait seams between the orchestrator and its pluggable backends, mirrored
//! from the `LanguageModel` / `SpeechToText` / `TextToSpeech` seam shape:
//! each concern gets its own narrow async trait rather than one God trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::audio_artifact::AudioProperties;
use crate::error::Result;

/// A chat-style message exchanged with a model backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The seam every stage agent talks to, implemented once per supported
/// protocol (assistant thread/run, generic chat completion) and selected by
/// the `BackendChooser` at startup (spec §4.1 "two supported backend
/// protocols").
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(&self, messages: &[Message]) -> Result<String>;

    /// Human-readable identifier for logs and error messages, e.g.
    /// `"assistant"` or `"chat"`.
    fn name(&self) -> &'static str;
}

/// One stage of the pipeline: takes a typed input, produces a typed output.
/// Implemented by each of the seven agents (Planner through Editor).
#[async_trait]
pub trait StageAgent<In, Out>: Send + Sync
where
    In: Send + Sync,
    Out: Send + Sync,
{
    async fn run(&self, input: In) -> Result<Out>;

    fn stage_name(&self) -> &'static str;
}

/// Turns one utterance's text into spoken audio bytes (spec §4.8).
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>>;
}

/// External audio tooling used by the Audio Assembler (C9): concatenation
/// and property probing, both realized as subprocess calls in production
/// and mockable for tests (spec §4.9).
#[async_trait]
pub trait AudioTool: Send + Sync {
    async fn concat(&self, clips: &[PathBuf], output: &Path) -> Result<()>;

    async fn probe(&self, path: &Path) -> Result<AudioProperties>;
}

/// Fetches the optional `source` referenced by a Brief, either from the
/// local filesystem or over HTTP, returning a `(title, body)` pair (spec
/// §4.3).
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, source: &str) -> Result<(String, String)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_set_expected_roles() {
        assert_eq!(Message::system("x").role, Role::System);
        assert_eq!(Message::user("x").role, Role::User);
        assert_eq!(Message::assistant("x").role, Role::Assistant);
    }
}
