//! `AudioTool` implementation backed by the `ffmpeg`/`ffprobe` subprocesses
//! (spec §4.9, §6 "Audio tool"): concat demuxer with a generated file list,
//! `libmp3lame` encoding, and `ffprobe -print_format json` for the
//! duration/bitrate/codec/sample-rate probe.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use podforge_core::traits::AudioTool;
use podforge_core::{AudioProperties, Result};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::AudioError;

pub struct FfmpegAudioTool {
    ffmpeg_bin: String,
    ffprobe_bin: String,
}

impl Default for FfmpegAudioTool {
    fn default() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
        }
    }
}

impl FfmpegAudioTool {
    pub fn new(ffmpeg_bin: impl Into<String>, ffprobe_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            ffprobe_bin: ffprobe_bin.into(),
        }
    }

    async fn write_concat_list(&self, clips: &[PathBuf], dir: &Path) -> Result<PathBuf> {
        let list_path = dir.join(format!("concat-{}.txt", uuid::Uuid::new_v4()));
        let mut contents = String::new();
        for clip in clips {
            // ffmpeg's concat demuxer format: `file '<path>'`, single quotes escaped.
            let escaped = clip.display().to_string().replace('\'', "'\\''");
            contents.push_str(&format!("file '{escaped}'\n"));
        }
        let mut file = tokio::fs::File::create(&list_path)
            .await
            .map_err(|source| AudioError::Io {
                path: list_path.display().to_string(),
                source,
            })?;
        file.write_all(contents.as_bytes())
            .await
            .map_err(|source| AudioError::Io {
                path: list_path.display().to_string(),
                source,
            })?;
        Ok(list_path)
    }
}

#[derive(Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Deserialize)]
struct FfprobeStream {
    codec_name: Option<String>,
    sample_rate: Option<String>,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[async_trait]
impl AudioTool for FfmpegAudioTool {
    /// Concatenates `clips` in order into `output` using the concat demuxer
    /// (`n=count, a=1, v=0` semantics) and `libmp3lame` encoding (spec
    /// §4.9). Ordering is preserved by writing the list file in `clips`'
    /// given order, never by arrival.
    async fn concat(&self, clips: &[PathBuf], output: &Path) -> Result<()> {
        if clips.is_empty() {
            return Err(AudioError::Concat("no clips to concatenate".to_string()).into());
        }
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let list_path = self.write_concat_list(clips, parent).await?;

        let result = Command::new(&self.ffmpeg_bin)
            .arg("-y")
            .arg("-f")
            .arg("concat")
            .arg("-safe")
            .arg("0")
            .arg("-i")
            .arg(&list_path)
            .arg("-c:a")
            .arg("libmp3lame")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let _ = tokio::fs::remove_file(&list_path).await;

        let output_result = result.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AudioError::ToolMissing(self.ffmpeg_bin.clone())
            } else {
                AudioError::Concat(e.to_string())
            }
        })?;

        if !output_result.status.success() {
            let stderr = String::from_utf8_lossy(&output_result.stderr);
            return Err(AudioError::Concat(format!(
                "ffmpeg exited with {:?}: {}",
                output_result.status.code(),
                stderr.lines().last().unwrap_or_default()
            ))
            .into());
        }
        Ok(())
    }

    /// Probes `path` for duration, bitrate, codec, and sample rate via
    /// `ffprobe -print_format json` (spec §4.9).
    async fn probe(&self, path: &Path) -> Result<AudioProperties> {
        let output = Command::new(&self.ffprobe_bin)
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("format=duration,bit_rate:stream=codec_name,sample_rate")
            .arg("-print_format")
            .arg("json")
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AudioError::ToolMissing(self.ffprobe_bin.clone())
                } else {
                    AudioError::Probe(e.to_string())
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AudioError::Probe(stderr.to_string()).into());
        }

        let parsed: FfprobeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| AudioError::Probe(format!("invalid ffprobe json: {e}")))?;

        let duration_sec: f32 = parsed
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse().ok())
            .unwrap_or(0.0);
        let bitrate_kbps: u32 = parsed
            .format
            .bit_rate
            .as_deref()
            .and_then(|b| b.parse::<u32>().ok())
            .map(|bps| bps / 1000)
            .unwrap_or(0);
        let stream = parsed.streams.first();
        let codec = stream
            .and_then(|s| s.codec_name.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let sample_rate_hz: u32 = stream
            .and_then(|s| s.sample_rate.as_deref())
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        Ok(AudioProperties {
            duration_sec,
            bitrate_kbps,
            codec,
            sample_rate_hz,
        })
    }
}
