//! Backend A: the specialized remote-agent ("assistant") protocol (spec
//! §4.1, §6): create a thread, append the user message, run-and-wait, read
//! the assistant's reply. Treats `run.status = "failed"` as a soft failure
//! so the `BackendChooser` falls through to Backend B.

use async_trait::async_trait;
use podforge_core::traits::{Message, ModelBackend, Role};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::retry::retry_with_backoff;

#[derive(Debug, Clone)]
pub struct AssistantBackendConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub agent_id: String,
    pub timeout_secs: u64,
}

pub struct AssistantBackend {
    client: Client,
    config: AssistantBackendConfig,
}

#[derive(Serialize)]
struct CreateThreadRequest {}

#[derive(Deserialize)]
struct ThreadResponse {
    id: String,
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct RunRequest<'a> {
    agent_id: &'a str,
}

#[derive(Deserialize)]
struct RunResponse {
    status: String,
    response_text: Option<String>,
}

impl AssistantBackend {
    pub fn new(config: AssistantBackendConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Availability probe required before Backend A is attempted (spec
    /// §4.1, §6 "Availability probe required").
    pub async fn is_available(&self) -> bool {
        self.authed(self.client.get(self.url("/health")))
            .send()
            .await
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }

    async fn create_thread(&self) -> Result<String, LlmError> {
        let resp = self
            .authed(self.client.post(self.url("/threads")))
            .json(&CreateThreadRequest {})
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(LlmError::Api(format!("create_thread: {}", resp.status())));
        }
        let body: ThreadResponse = resp.json().await.map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        Ok(body.id)
    }

    async fn create_message(&self, thread_id: &str, content: &str) -> Result<(), LlmError> {
        let resp = self
            .authed(self.client.post(self.url(&format!("/threads/{}/messages", thread_id))))
            .json(&CreateMessageRequest {
                role: "user",
                content,
            })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(LlmError::Api(format!("create_message: {}", resp.status())));
        }
        Ok(())
    }

    async fn run_and_wait(&self, thread_id: &str) -> Result<RunResponse, LlmError> {
        let resp = self
            .authed(self.client.post(self.url(&format!("/threads/{}/runs", thread_id))))
            .json(&RunRequest {
                agent_id: &self.config.agent_id,
            })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(LlmError::Api(format!("run: {}", resp.status())));
        }
        resp.json().await.map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ModelBackend for AssistantBackend {
    async fn generate(&self, messages: &[Message]) -> podforge_core::Result<String> {
        let user_content = messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let result = retry_with_backoff("assistant.generate", || async {
            let thread_id = self.create_thread().await?;
            self.create_message(&thread_id, &user_content).await?;
            let run = self.run_and_wait(&thread_id).await?;
            if run.status == "failed" {
                return Err(LlmError::Unavailable("run.status=failed".to_string()));
            }
            run.response_text
                .ok_or_else(|| LlmError::InvalidResponse("missing response_text".to_string()))
        })
        .await?;

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "assistant"
    }
}
