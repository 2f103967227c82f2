//! The Speech Synthesizer (C8): turns each utterance into an MP3 file on
//! disk, voice selected by speaker (spec §4.8).

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use podforge_core::traits::TextToSpeech;
use podforge_core::{Result, Speaker, Utterance};

use crate::error::AudioError;

/// Per-speaker voice selection, keyed on `Speaker` (spec §4.8: "Look up
/// voice by speaker: {host1 -> voice-A, host2 -> voice-B}").
pub trait VoiceSelector: Send + Sync {
    fn voice_for(&self, speaker: Speaker) -> &str;
}

pub struct SpeechSynthesizer<T: TextToSpeech, V: VoiceSelector> {
    tts: T,
    voices: V,
}

impl<T: TextToSpeech, V: VoiceSelector> SpeechSynthesizer<T, V> {
    pub fn new(tts: T, voices: V) -> Self {
        Self { tts, voices }
    }

    /// Synthesizes one utterance and writes it atomically (write to a
    /// `.part` sibling, then rename) into `scratch_dir` (spec §4.8: "Write
    /// the bytes to disk atomically").
    pub async fn synthesize_utterance(
        &self,
        utterance: &Utterance,
        scratch_dir: &Path,
    ) -> Result<PathBuf> {
        let voice = self.voices.voice_for(utterance.speaker);
        let bytes = self
            .tts
            .synthesize(&utterance.text, voice)
            .await
            .map_err(|e| AudioError::Synthesis {
                index: utterance.index,
                message: e.message,
            })?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros();
        let filename = format!(
            "chapter-{}-utterance-{}-{}.mp3",
            utterance.chapter_number, utterance.index, timestamp
        );
        let final_path = scratch_dir.join(&filename);
        let part_path = scratch_dir.join(format!("{filename}.part"));

        tokio::fs::write(&part_path, &bytes)
            .await
            .map_err(|source| AudioError::Io {
                path: part_path.display().to_string(),
                source,
            })?;
        tokio::fs::rename(&part_path, &final_path)
            .await
            .map_err(|source| AudioError::Io {
                path: final_path.display().to_string(),
                source,
            })?;

        Ok(final_path)
    }

    /// Synthesizes every utterance in order. Serial by default (spec §5:
    /// "the reference order is serial"); a single failed utterance is fatal
    /// to the job, with no silent skip (spec §4.8).
    pub async fn synthesize_all(
        &self,
        utterances: &[Utterance],
        scratch_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(utterances.len());
        for utterance in utterances {
            paths.push(self.synthesize_utterance(utterance, scratch_dir).await?);
        }
        Ok(paths)
    }
}
