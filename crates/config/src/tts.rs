//! TTS configuration (spec §6 `tts.*` keys).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsVoices {
    #[serde(default = "default_voice_host1")]
    pub host1: String,
    #[serde(default = "default_voice_host2")]
    pub host2: String,
}

fn default_voice_host1() -> String {
    "alloy".to_string()
}
fn default_voice_host2() -> String {
    "echo".to_string()
}

impl Default for TtsVoices {
    fn default() -> Self {
        Self {
            host1: default_voice_host1(),
            host2: default_voice_host2(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_model")]
    pub model: String,
    #[serde(default)]
    pub voices: TtsVoices,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}
fn default_speed() -> f32 {
    1.0
}
fn default_format() -> String {
    "mp3".to_string()
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            model: default_tts_model(),
            voices: TtsVoices::default(),
            speed: default_speed(),
            format: default_format(),
        }
    }
}

impl TtsConfig {
    pub fn voice_for(&self, speaker: podforge_core::Speaker) -> &str {
        match speaker {
            podforge_core::Speaker::Host1 => &self.voices.host1,
            podforge_core::Speaker::Host2 => &self.voices.host2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_design_defaults() {
        let tts = TtsConfig::default();
        assert_eq!(tts.voices.host1, "alloy");
        assert_eq!(tts.voices.host2, "echo");
        assert_eq!(tts.speed, 1.0);
        assert_eq!(tts.format, "mp3");
    }

    #[test]
    fn voice_for_keys_on_speaker() {
        let tts = TtsConfig::default();
        assert_eq!(tts.voice_for(podforge_core::Speaker::Host1), "alloy");
        assert_eq!(tts.voice_for(podforge_core::Speaker::Host2), "echo");
    }
}
