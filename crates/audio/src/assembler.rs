//! The Audio Assembler (C9): stitches per-utterance clips into per-chapter
//! files, then chapter files into the final episode, optionally prefixed by
//! a jingle, then probes the result (spec §4.9).

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use podforge_core::traits::AudioTool;
use podforge_core::{AudioArtifact, Result};

use crate::error::AudioError;

pub struct AudioAssembler<A: AudioTool> {
    tool: A,
    /// Process-wide read-only asset, always first when present (spec §3,
    /// §4.9 "Jingle, if present, is always first").
    jingle_path: Option<PathBuf>,
}

impl<A: AudioTool> AudioAssembler<A> {
    pub fn new(tool: A, jingle_path: Option<PathBuf>) -> Self {
        Self { tool, jingle_path }
    }

    /// Concatenates one chapter's utterance clips, in parse order, into a
    /// single combined MP3 under `scratch_dir` (spec §4.9 step 1).
    pub async fn assemble_chapter(
        &self,
        chapter_number: u32,
        clips: &[PathBuf],
        scratch_dir: &Path,
    ) -> Result<PathBuf> {
        let timestamp = now_micros();
        let output = scratch_dir.join(format!("chapter-{chapter_number}-combined-{timestamp}.mp3"));
        self.tool.concat(clips, &output).await.map_err(|err| {
            tracing::error!(chapter_number, error = %err, "chapter concat failed");
            err
        })?;
        Ok(output)
    }

    /// Concatenates chapter files (in plan order) into `{jobId}.mp3`,
    /// prepending the jingle if it exists on disk, then probes the result
    /// (spec §4.9 steps 2-3). On any failure, deletes whatever partial
    /// output was produced (spec §4.9 "prior partial outputs are deleted").
    pub async fn assemble_final(
        &self,
        chapter_files: &[PathBuf],
        output_path: &Path,
    ) -> Result<AudioArtifact> {
        if chapter_files.is_empty() {
            return Err(AudioError::Concat("no chapter files to assemble".to_string()).into());
        }

        let mut ordered: Vec<PathBuf> = Vec::with_capacity(chapter_files.len() + 1);
        if let Some(jingle) = &self.jingle_path {
            if tokio::fs::metadata(jingle).await.is_ok() {
                ordered.push(jingle.clone());
            } else {
                tracing::debug!(path = %jingle.display(), "configured jingle asset not found, skipping");
            }
        }
        ordered.extend_from_slice(chapter_files);

        if let Err(err) = self.tool.concat(&ordered, output_path).await {
            let _ = tokio::fs::remove_file(output_path).await;
            return Err(err);
        }

        let properties = match self.tool.probe(output_path).await {
            Ok(props) => props,
            Err(err) => {
                let _ = tokio::fs::remove_file(output_path).await;
                return Err(err);
            }
        };

        Ok(AudioArtifact {
            path: output_path.to_path_buf(),
            properties,
            clip_count: ordered.len(),
        })
    }
}

fn now_micros() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use podforge_core::AudioProperties;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockAudioTool {
        concat_calls: Arc<Mutex<Vec<Vec<PathBuf>>>>,
        fail_concat: bool,
        fail_probe: bool,
        probe_calls: AtomicUsize,
    }

    #[async_trait]
    impl AudioTool for MockAudioTool {
        async fn concat(&self, clips: &[PathBuf], output: &Path) -> Result<()> {
            self.concat_calls.lock().unwrap().push(clips.to_vec());
            if self.fail_concat {
                return Err(podforge_core::Error::audio("mock concat failure"));
            }
            tokio::fs::write(output, b"fake mp3 bytes").await.unwrap();
            Ok(())
        }

        async fn probe(&self, _path: &Path) -> Result<AudioProperties> {
            self.probe_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_probe {
                return Err(podforge_core::Error::audio("mock probe failure"));
            }
            Ok(AudioProperties {
                duration_sec: 42.0,
                bitrate_kbps: 128,
                codec: "mp3".to_string(),
                sample_rate_hz: 44_100,
            })
        }
    }

    #[tokio::test]
    async fn assemble_final_prepends_jingle_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let jingle = dir.path().join("jingle.mp3");
        tokio::fs::write(&jingle, b"jingle bytes").await.unwrap();

        let tool = MockAudioTool::default();
        let calls = tool.concat_calls.clone();
        let assembler = AudioAssembler::new(tool, Some(jingle.clone()));

        let chapter1 = dir.path().join("chapter-1.mp3");
        let output = dir.path().join("final.mp3");
        let artifact = assembler
            .assemble_final(&[chapter1.clone()], &output)
            .await
            .unwrap();

        assert_eq!(artifact.clip_count, 2);
        let recorded = calls.lock().unwrap();
        assert_eq!(recorded[0][0], jingle);
        assert_eq!(recorded[0][1], chapter1);
    }

    #[tokio::test]
    async fn assemble_final_skips_missing_jingle() {
        let dir = tempfile::tempdir().unwrap();
        let tool = MockAudioTool::default();
        let assembler = AudioAssembler::new(tool, Some(dir.path().join("no-such-jingle.mp3")));

        let chapter1 = dir.path().join("chapter-1.mp3");
        let output = dir.path().join("final.mp3");
        let artifact = assembler
            .assemble_final(&[chapter1], &output)
            .await
            .unwrap();
        assert_eq!(artifact.clip_count, 1);
    }

    #[tokio::test]
    async fn concat_failure_deletes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("final.mp3");
        tokio::fs::write(&output, b"stale partial output").await.unwrap();

        let tool = MockAudioTool {
            fail_concat: true,
            ..Default::default()
        };
        let assembler = AudioAssembler::new(tool, None);
        let result = assembler
            .assemble_final(&[dir.path().join("chapter-1.mp3")], &output)
            .await;

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn probe_failure_also_deletes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("final.mp3");

        let tool = MockAudioTool {
            fail_probe: true,
            ..Default::default()
        };
        let assembler = AudioAssembler::new(tool, None);
        let result = assembler
            .assemble_final(&[dir.path().join("chapter-1.mp3")], &output)
            .await;

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn rejects_empty_chapter_list() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = AudioAssembler::new(MockAudioTool::default(), None);
        let err = assembler
            .assemble_final(&[], &dir.path().join("final.mp3"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, podforge_core::ErrorKind::Audio);
    }
}
