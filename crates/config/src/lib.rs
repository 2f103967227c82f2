//! Layered configuration for the podcast generation pipeline.
//!
//! Supports loading from:
//! - YAML/TOML files under `config/`
//! - `PODFORGE_`-prefixed environment variables
//! - Struct defaults, when neither is present

pub mod agents;
pub mod allowed;
pub mod backend;
pub mod constraints;
pub mod performance;
pub mod settings;
pub mod tts;

pub use agents::AgentsConfig;
pub use allowed::{allowed_moods, allowed_styles, allowed_tones};
pub use backend::{AssistantBackendSettings, BackendConfig, ChatBackendSettings, TtsEndpointSettings};
pub use constraints::ConstraintsConfig;
pub use performance::PerformanceConfig;
pub use settings::{load_settings, ConfigError, ServerConfig, Settings};
pub use tts::{TtsConfig, TtsVoices};
