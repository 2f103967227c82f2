//! Top-level `Settings` document and its layered loader, mirrored from the
//! teacher's `load_settings`: defaults, then an optional environment file,
//! then environment variables, highest priority last.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agents::AgentsConfig;
use crate::backend::BackendConfig;
use crate::constraints::ConstraintsConfig;
use crate::performance::PerformanceConfig;
use crate::tts::TtsConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<ConfigError> for podforge_core::Error {
    fn from(err: ConfigError) -> Self {
        podforge_core::Error::internal(err.to_string())
    }
}

/// Top-level settings document (spec §6 "Configuration keys recognized").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub tts: TtsConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub constraints: ConstraintsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,
    /// Path to an optional jingle asset prepended to the final MP3, if it
    /// exists on disk (spec §4.9, §6 "Jingle MP3... process-wide read-only").
    #[serde(default)]
    pub jingle_path: Option<String>,
    /// Origins allowed to call the job API from a browser. Empty defaults to
    /// `localhost:3000`; see `cors_enabled` to disable the check entirely.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_output_dir() -> String {
    "output".to_string()
}
fn default_temp_dir() -> String {
    "tmp".to_string()
}
fn default_cors_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            output_dir: default_output_dir(),
            temp_dir: default_temp_dir(),
            jingle_path: None,
            cors_origins: Vec::new(),
            cors_enabled: default_cors_enabled(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.constraints.min_chapters == 0 {
            return Err(ConfigError::InvalidValue {
                field: "constraints.min_chapters".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.constraints.min_chapters > self.constraints.max_chapters {
            return Err(ConfigError::InvalidValue {
                field: "constraints.max_chapters".to_string(),
                message: "must be >= min_chapters".to_string(),
            });
        }
        if self.performance.max_concurrent_agents == 0 {
            return Err(ConfigError::InvalidValue {
                field: "performance.max_concurrent_agents".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.performance.max_concurrent_jobs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "performance.max_concurrent_jobs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads settings from files and environment variables.
///
/// Priority (lowest to highest):
/// 1. `config/default.{yaml,toml}`
/// 2. `config/{env}.{yaml,toml}`, if `env` is given
/// 3. `PODFORGE_` prefixed environment variables, `__` nested separator
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("PODFORGE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_pass_validation() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn inverted_chapter_bounds_fail_validation() {
        let mut settings = Settings::default();
        settings.constraints.max_chapters = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn load_settings_with_no_files_falls_back_to_defaults() {
        let settings = load_settings(None).expect("defaults alone must load");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.performance.words_per_minute, 150);
    }
}
