//! The Audio Assembler's (C9) output: the final concatenated episode and
//! the per-utterance clips it was built from.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One synthesized utterance clip on disk, before concatenation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtteranceClip {
    pub utterance_index: u32,
    pub path: PathBuf,
    pub duration_sec: f32,
}

/// Probed properties of an assembled audio file (spec §4.9, via `ffprobe`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioProperties {
    pub duration_sec: f32,
    pub bitrate_kbps: u32,
    pub codec: String,
    pub sample_rate_hz: u32,
}

/// The final episode artifact: an MP3 file plus the properties `ffprobe`
/// reported for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioArtifact {
    pub path: PathBuf,
    pub properties: AudioProperties,
    pub clip_count: usize,
}

impl AudioArtifact {
    /// A generated episode is expected to run within roughly the planned
    /// duration; this is a loose sanity check, not a tolerance gate (the
    /// word-budget tolerances in `word_budget` are authoritative).
    pub fn roughly_matches_planned_duration(&self, planned_min: u32) -> bool {
        let planned_sec = planned_min as f32 * 60.0;
        if planned_sec == 0.0 {
            return true;
        }
        let deviation = (self.properties.duration_sec - planned_sec).abs() / planned_sec;
        deviation <= 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roughly_matches_planned_duration_allows_generous_slack() {
        let artifact = AudioArtifact {
            path: PathBuf::from("/tmp/episode.mp3"),
            properties: AudioProperties {
                duration_sec: 290.0,
                bitrate_kbps: 128,
                codec: "mp3".to_string(),
                sample_rate_hz: 44_100,
            },
            clip_count: 42,
        };
        assert!(artifact.roughly_matches_planned_duration(5));
        assert!(!artifact.roughly_matches_planned_duration(1));
    }
}
