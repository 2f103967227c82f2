//! Connection settings for the two model-backend protocols (spec §4.1 "two
//! supported backend protocols") and the TTS endpoint, authenticated via
//! environment-supplied credentials (spec §6 "Authentication via
//! environment-supplied credentials"). Not named among spec.md's distilled
//! `Configuration keys recognized` list, which only enumerates behavioral
//! knobs (`tts.*`, `performance.*`, ...); wiring the two backend protocols
//! to real endpoints is ambient plumbing every process needs, mirrored from
//! the teacher's `LlmConfig` (`crates/config/src/agent.rs`).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Generic chat-completion endpoint (env: `PODFORGE_CHAT_URL`), falling
/// back to a local Ollama-compatible server the way the teacher's
/// `OLLAMA_DEFAULT` does.
static CHAT_ENDPOINT_DEFAULT: Lazy<String> = Lazy::new(|| {
    std::env::var("PODFORGE_CHAT_URL").unwrap_or_else(|_| "http://localhost:11434/v1".to_string())
});

/// TTS endpoint (env: `PODFORGE_TTS_URL`).
static TTS_ENDPOINT_DEFAULT: Lazy<String> = Lazy::new(|| {
    std::env::var("PODFORGE_TTS_URL").unwrap_or_else(|_| "http://localhost:11434/v1".to_string())
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBackendSettings {
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_chat_endpoint() -> String {
    CHAT_ENDPOINT_DEFAULT.clone()
}
fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_temperature() -> f32 {
    0.7
}
fn default_top_p() -> f32 {
    0.9
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for ChatBackendSettings {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            api_key: None,
            model: default_chat_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Backend A (specialized remote-agent protocol). `endpoint` is `None` by
/// default: an unconfigured endpoint means every stage's `BackendChooser`
/// falls through to Backend B, the same as an unset `agents.{role}Id`
/// (spec §4.1, §9 "Two-backend strategy").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantBackendSettings {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AssistantBackendSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsEndpointSettings {
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_tts_endpoint() -> String {
    TTS_ENDPOINT_DEFAULT.clone()
}

impl Default for TtsEndpointSettings {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub chat: ChatBackendSettings,
    #[serde(default)]
    pub assistant: AssistantBackendSettings,
    #[serde(default)]
    pub tts: TtsEndpointSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_endpoint_unset_by_default() {
        assert!(AssistantBackendSettings::default().endpoint.is_none());
    }

    #[test]
    fn chat_defaults_are_nonempty() {
        let chat = ChatBackendSettings::default();
        assert!(!chat.endpoint.is_empty());
        assert!(!chat.model.is_empty());
    }
}
