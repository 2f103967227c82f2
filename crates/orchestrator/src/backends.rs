//! Wires `podforge-config` connection settings into the concrete backend
//! instances each stage needs: one `BackendChooser` per LLM-backed stage
//! role, and one `HttpTtsBackend` for speech synthesis (spec §4.1, §9
//! "Two-backend strategy").

use podforge_config::{AgentsConfig, BackendConfig, TtsConfig};
use podforge_core::Stage;
use podforge_llm::{
    AssistantBackend, AssistantBackendConfig, BackendChooser, ChatBackend, ChatBackendConfig,
    HttpTtsBackend, LlmError, TtsBackendConfig,
};

fn build_chat_backend(cfg: &BackendConfig) -> Result<ChatBackend, LlmError> {
    ChatBackend::new(ChatBackendConfig {
        endpoint: cfg.chat.endpoint.clone(),
        api_key: cfg.chat.api_key.clone(),
        model: cfg.chat.model.clone(),
        max_tokens: cfg.chat.max_tokens,
        temperature: cfg.chat.temperature,
        top_p: cfg.chat.top_p,
        timeout_secs: cfg.chat.timeout_secs,
    })
}

/// `None` whenever the assistant endpoint or the role's agent id is
/// unconfigured; that stage's `BackendChooser` then only ever uses chat.
fn build_assistant_backend(cfg: &BackendConfig, agent_id: Option<&str>) -> Option<AssistantBackend> {
    let endpoint = cfg.assistant.endpoint.clone()?;
    let agent_id = agent_id?.to_string();
    AssistantBackend::new(AssistantBackendConfig {
        endpoint,
        api_key: cfg.assistant.api_key.clone(),
        agent_id,
        timeout_secs: cfg.assistant.timeout_secs,
    })
    .ok()
}

/// Builds the `BackendChooser` for one pipeline stage, wiring in that
/// stage's configured remote agent id, if any (spec §6 `agents.{role}Id`).
pub fn build_chooser_for_stage(
    backend_cfg: &BackendConfig,
    agents_cfg: &AgentsConfig,
    stage: Stage,
) -> Result<BackendChooser, LlmError> {
    let chat = build_chat_backend(backend_cfg)?;
    let assistant = build_assistant_backend(backend_cfg, agents_cfg.id_for(stage));
    Ok(BackendChooser::new(assistant, chat))
}

pub fn build_tts_backend(cfg: &BackendConfig, tts_cfg: &TtsConfig) -> Result<HttpTtsBackend, LlmError> {
    HttpTtsBackend::new(TtsBackendConfig {
        endpoint: cfg.tts.endpoint.clone(),
        api_key: cfg.tts.api_key.clone(),
        model: tts_cfg.model.clone(),
        speed: tts_cfg.speed,
        format: tts_cfg.format.clone(),
        timeout_secs: cfg.tts.timeout_secs,
    })
}
