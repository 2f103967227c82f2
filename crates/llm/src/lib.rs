//! Model backend selection, retry, and prompt building for the Agent
//! Runtime (C1): two backend protocols behind one trait, chosen with
//! automatic fallback, and the style-conditioned prompts each stage uses.

pub mod assistant;
pub mod chat;
pub mod chooser;
pub mod error;
pub mod prompts;
pub mod retry;

pub use assistant::{AssistantBackend, AssistantBackendConfig};
pub use chat::{ChatBackend, ChatBackendConfig, HttpTtsBackend, TtsBackendConfig};
pub use chooser::BackendChooser;
pub use error::LlmError;
pub use retry::{retry_with_backoff, MAX_ATTEMPTS};
