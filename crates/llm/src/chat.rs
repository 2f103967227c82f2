//! Backend B: the generic chat-completion protocol, plus its companion TTS
//! operation (spec §4.1, §6: `chat(messages, {...}) -> {content, ...}` and
//! `speak({model, voice, input, speed, format}) -> byteStream`).

use async_trait::async_trait;
use podforge_core::traits::{Message, ModelBackend, Role, TextToSpeech};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::retry::retry_with_backoff;

#[derive(Debug, Clone)]
pub struct ChatBackendConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout_secs: u64,
}

pub struct ChatBackend {
    client: Client,
    config: ChatBackendConfig,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> From<&'a Message> for ChatRequestMessage<'a> {
    fn from(m: &'a Message) -> Self {
        Self {
            role: match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: &m.content,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

impl ChatBackend {
    pub fn new(config: ChatBackendConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl ModelBackend for ChatBackend {
    async fn generate(&self, messages: &[Message]) -> podforge_core::Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: messages.iter().map(ChatRequestMessage::from).collect(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        };

        let content = retry_with_backoff("chat.generate", || async {
            let resp = self
                .authed(self.client.post(format!("{}/chat/completions", self.config.endpoint)))
                .json(&request)
                .send()
                .await?;
            if !resp.status().is_success() {
                let status = resp.status();
                if matches!(status.as_u16(), 400 | 401 | 403) {
                    return Err(LlmError::Api(format!("chat: {}", status)));
                }
                return Err(LlmError::Network(format!("chat: {}", status)));
            }
            let body: ChatResponse = resp.json().await.map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
            body.choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| LlmError::InvalidResponse("no choices in chat response".to_string()))
        })
        .await?;

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "chat"
    }
}

#[derive(Debug, Clone)]
pub struct TtsBackendConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub speed: f32,
    pub format: String,
    pub timeout_secs: u64,
}

pub struct HttpTtsBackend {
    client: Client,
    config: TtsBackendConfig,
}

#[derive(Serialize)]
struct SpeakRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    speed: f32,
    response_format: &'a str,
}

impl HttpTtsBackend {
    pub fn new(config: TtsBackendConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl TextToSpeech for HttpTtsBackend {
    async fn synthesize(&self, text: &str, voice: &str) -> podforge_core::Result<Vec<u8>> {
        let request = SpeakRequest {
            model: &self.config.model,
            voice,
            input: text,
            speed: self.config.speed,
            response_format: &self.config.format,
        };

        let bytes = retry_with_backoff("chat.speak", || async {
            let resp = self
                .authed(self.client.post(format!("{}/audio/speech", self.config.endpoint)))
                .json(&request)
                .send()
                .await?;
            if !resp.status().is_success() {
                let status = resp.status();
                if matches!(status.as_u16(), 400 | 401 | 403) {
                    return Err(LlmError::Api(format!("speak: {}", status)));
                }
                return Err(LlmError::Network(format!("speak: {}", status)));
            }
            resp.bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(LlmError::from)
        })
        .await?;

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_message_maps_roles() {
        let msg = Message::system("hello");
        let mapped = ChatRequestMessage::from(&msg);
        assert_eq!(mapped.role, "system");
        assert_eq!(mapped.content, "hello");
    }
}
