//! Bridges `podforge_config::TtsConfig` (voice names) to the audio crate's
//! `VoiceSelector` seam. Neither the trait nor the config type lives in this
//! crate, so a local newtype is the only way around the orphan rule.

use podforge_audio::VoiceSelector;
use podforge_config::TtsConfig;
use podforge_core::Speaker;

pub struct ConfiguredVoices(pub TtsConfig);

impl VoiceSelector for ConfiguredVoices {
    fn voice_for(&self, speaker: Speaker) -> &str {
        self.0.voice_for(speaker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delegates_to_tts_config() {
        let voices = ConfiguredVoices(TtsConfig::default());
        assert_eq!(voices.voice_for(Speaker::Host1), "alloy");
        assert_eq!(voices.voice_for(Speaker::Host2), "echo");
    }
}
