//! The Orchestrator (C10): drives one submitted Brief through all eight
//! stages in order, persisting progress to the Job Registry as it goes and
//! the final artifact bundle to disk once the job completes (spec §4.10).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use podforge_audio::{AudioAssembler, SpeechSynthesizer};
use podforge_config::Settings;
use podforge_core::traits::{AudioTool, ContentFetcher, StageAgent};
use podforge_core::word_budget::classify_accuracy;
use podforge_core::{
    Brief, BriefConstraints, Error, Job, JobId, JobMetadata, JobState, Result, Stage,
};
use podforge_llm::{BackendChooser, HttpTtsBackend, LlmError};
use podforge_pipeline::{
    generate_all, Editor, EditorInput, Outliner, OutlinerInput, Planner, Researcher,
    ResearcherInput, Scripter, ToneAnnotator,
};

use crate::backends::{build_chooser_for_stage, build_tts_backend};
use crate::registry::JobRegistry;
use crate::voices::ConfiguredVoices;

/// Wires every stage agent to a concrete `BackendChooser` and the TTS/audio
/// collaborators to their production implementations, then drives jobs
/// through in order. Generic only over the two collaborators spec.md calls
/// out as pluggable at the edges (content fetching, audio tooling); the LLM
/// stages all share one `BackendChooser` shape per spec §4.1.
pub struct Orchestrator<F: ContentFetcher, A: AudioTool> {
    registry: Arc<JobRegistry>,
    constraints: BriefConstraints,
    planner: Planner<BackendChooser>,
    researcher: Researcher<BackendChooser, F>,
    outliner: Outliner<BackendChooser>,
    scripter: Scripter<BackendChooser>,
    tone_annotator: ToneAnnotator<BackendChooser>,
    editor: Editor<BackendChooser>,
    synthesizer: SpeechSynthesizer<HttpTtsBackend, ConfiguredVoices>,
    assembler: AudioAssembler<A>,
    performance: podforge_config::PerformanceConfig,
    output_dir: PathBuf,
    temp_dir: PathBuf,
    /// Caps jobs actually running `drive` at once (spec §5
    /// `performance.maxConcurrentJobs`); acquired before a job leaves
    /// `queued`, released when `run_job` returns.
    job_slots: tokio::sync::Semaphore,
}

impl<F: ContentFetcher, A: AudioTool> Orchestrator<F, A> {
    pub fn new(
        settings: &Settings,
        registry: Arc<JobRegistry>,
        fetcher: F,
        audio_tool: A,
    ) -> std::result::Result<Self, LlmError> {
        let planner = Planner::new(build_chooser_for_stage(
            &settings.backend,
            &settings.agents,
            Stage::Planning,
        )?);
        let researcher = Researcher::new(
            build_chooser_for_stage(&settings.backend, &settings.agents, Stage::Research)?,
            fetcher,
        );
        let outliner = Outliner::new(build_chooser_for_stage(
            &settings.backend,
            &settings.agents,
            Stage::Outline,
        )?);
        let scripter = Scripter::new(build_chooser_for_stage(
            &settings.backend,
            &settings.agents,
            Stage::Scripting,
        )?);
        let tone_annotator = ToneAnnotator::new(build_chooser_for_stage(
            &settings.backend,
            &settings.agents,
            Stage::ToneAnnotation,
        )?);
        let editor = Editor::new(build_chooser_for_stage(
            &settings.backend,
            &settings.agents,
            Stage::Editing,
        )?);

        let tts = build_tts_backend(&settings.backend, &settings.tts)?;
        let synthesizer = SpeechSynthesizer::new(tts, ConfiguredVoices(settings.tts.clone()));

        let jingle_path = settings.server.jingle_path.as_ref().map(PathBuf::from);
        let assembler = AudioAssembler::new(audio_tool, jingle_path);

        let job_slots = tokio::sync::Semaphore::new(settings.performance.max_concurrent_jobs);

        Ok(Self {
            registry,
            constraints: (&settings.constraints).into(),
            planner,
            researcher,
            outliner,
            scripter,
            tone_annotator,
            editor,
            synthesizer,
            assembler,
            performance: settings.performance.clone(),
            output_dir: PathBuf::from(&settings.server.output_dir),
            temp_dir: PathBuf::from(&settings.server.temp_dir),
            job_slots,
        })
    }

    /// Validates `brief`, creates a queued job, and hands it back without
    /// starting processing. Call `spawn` on the returned id (wrapped in an
    /// `Arc<Self>`) to actually run it; kept as two steps so the server
    /// crate's handler can return `202 Accepted` immediately (spec §6
    /// `submit`).
    pub fn accept(&self, brief: Brief, request_id: Option<String>) -> Result<Job> {
        brief.validate(&self.constraints)?;
        Ok(self.registry.create(brief, request_id))
    }

    pub fn validate(&self, brief: &Brief) -> crate::validation::ValidationReport {
        crate::validation::validate_brief(brief, &self.constraints, &self.performance)
    }

    pub fn get(&self, id: JobId) -> Option<Job> {
        self.registry.get(id)
    }

    pub fn list(&self, limit: usize, offset: usize) -> Vec<Job> {
        self.registry.list(limit, offset)
    }

    pub fn cancel(&self, id: JobId) -> Result<JobState> {
        self.registry.cancel(id)
    }

    /// Spawns `run_job` as a background task. Takes `Arc<Self>` because the
    /// task must outlive the caller's handler (spec §4.10 "drive stages...").
    pub fn spawn(self: &Arc<Self>, id: JobId) {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            orchestrator.run_job(id).await;
        });
    }

    async fn run_job(&self, id: JobId) {
        let _permit = match self.job_slots.acquire().await {
            Ok(permit) => permit,
            Err(_) => return,
        };
        let start = Instant::now();
        if let Err(err) = self.drive(id, start).await {
            self.fail_job(id, &err).await;
        }
    }

    fn ensure_not_cancelled(&self, id: JobId) -> Result<()> {
        match self.registry.get(id) {
            Some(job) if job.state == JobState::Cancelled => Err(Error::cancelled(
                job.progress
                    .stage
                    .map(|s| s.as_str())
                    .unwrap_or("unknown")
                    .to_string(),
            )),
            Some(_) => Ok(()),
            None => Err(Error::internal(format!("job {id} vanished mid-run"))),
        }
    }

    fn record_stage(&self, id: JobId, stage: Stage, steps_completed: u32) -> Result<()> {
        self.registry.update(id, |job| {
            job.progress.stage = Some(stage);
            job.progress.steps_completed = steps_completed;
        })?;
        Ok(())
    }

    /// The sequential steps 1-6 of spec §4.10, each gated by a cancellation
    /// check "at the next stage boundary" before the stage call is made.
    async fn drive(&self, id: JobId, start: Instant) -> Result<()> {
        let job = self
            .registry
            .get(id)
            .ok_or_else(|| Error::internal(format!("job {id} not found")))?;
        let brief = job.brief.clone();

        self.registry
            .update(id, |j| j.transition(JobState::Processing).unwrap_or(()))?;

        self.ensure_not_cancelled(id)?;
        let plan = self.planner.run(brief.clone()).await?;
        self.registry
            .update(id, |j| j.artifacts.plan = Some(plan.clone()))?;
        self.record_stage(id, Stage::Planning, 1)?;

        self.ensure_not_cancelled(id)?;
        let research = self
            .researcher
            .run(ResearcherInput {
                brief: brief.clone(),
                plan_markdown: plan.markdown.clone(),
            })
            .await?;
        self.registry
            .update(id, |j| j.artifacts.research = Some(research.clone()))?;
        self.record_stage(id, Stage::Research, 2)?;

        self.ensure_not_cancelled(id)?;
        let outline = self
            .outliner
            .run(OutlinerInput {
                brief: brief.clone(),
                plan: plan.clone(),
            })
            .await?;
        self.registry
            .update(id, |j| j.artifacts.outline = Some(outline.chapters.clone()))?;
        self.record_stage(id, Stage::Outline, 3)?;

        self.ensure_not_cancelled(id)?;
        let scripts = generate_all(
            &self.scripter,
            &brief,
            outline.chapters,
            plan.word_budget,
            self.performance.max_concurrent_agents,
        )
        .await?;
        self.registry
            .update(id, |j| j.artifacts.scripts = Some(scripts.clone()))?;
        self.record_stage(id, Stage::Scripting, 4)?;

        self.ensure_not_cancelled(id)?;
        let tone_scripts = self.tone_annotator.run(scripts).await?;
        self.registry
            .update(id, |j| j.artifacts.tone_script = Some(tone_scripts.clone()))?;
        self.record_stage(id, Stage::ToneAnnotation, 5)?;

        self.ensure_not_cancelled(id)?;
        let final_script = self
            .editor
            .run(EditorInput {
                chapters: tone_scripts,
                target_words: plan.word_budget.total_words as f32,
            })
            .await?;
        self.registry
            .update(id, |j| j.artifacts.final_script = Some(final_script.clone()))?;
        self.record_stage(id, Stage::Editing, 6)?;

        self.ensure_not_cancelled(id)?;
        let scratch_dir = self.temp_dir.join(id.to_string());
        tokio::fs::create_dir_all(&scratch_dir)
            .await
            .map_err(|e| Error::internal(format!("could not create scratch dir: {e}")))?;

        let synth_result = self.synthesize_and_assemble(id, &final_script, &scratch_dir).await;

        if let Err(e) = tokio::fs::remove_dir_all(&scratch_dir).await {
            tracing::warn!(job_id = %id, error = %e, "failed to remove scratch directory");
        }

        let artifact = synth_result?;
        self.record_stage(id, Stage::Synthesis, podforge_core::TOTAL_STEPS)?;

        let duration_sec = artifact.properties.duration_sec;
        let word_count = final_script.word_count;
        let target_words = plan.word_budget.total_words;

        if !plan.word_budget.within_completion_lenient_tolerance(word_count) {
            tracing::warn!(
                job_id = %id,
                target_words,
                word_count,
                deviation_pct = plan.word_budget.deviation_pct(word_count),
                "final script deviates more than the 15% lenient gate from the target word count"
            );
        }

        let metadata = JobMetadata {
            duration_sec,
            word_count,
            chapters: brief.chapters,
            actual_words_per_minute: if duration_sec > 0.0 {
                word_count as f32 * 60.0 / duration_sec
            } else {
                0.0
            },
            accuracy: classify_accuracy(target_words, word_count),
            generation_time_ms: start.elapsed().as_millis() as u64,
        };

        self.registry.update(id, |j| {
            j.artifact = Some(artifact);
            j.metadata = Some(metadata);
            let _ = j.transition(JobState::Completed);
        })?;

        self.persist_artifacts(id).await?;
        tracing::info!(job_id = %id, "job completed");
        Ok(())
    }

    /// Synthesizes and assembles every chapter in order (spec §4.8, §4.9),
    /// reporting fan-out-style progress via `chapters_done`/`chapters_total`
    /// even though synthesis itself runs serially.
    async fn synthesize_and_assemble(
        &self,
        id: JobId,
        final_script: &podforge_core::FinalScript,
        scratch_dir: &std::path::Path,
    ) -> Result<podforge_core::AudioArtifact> {
        let total_chapters = final_script.chapters.len() as u32;
        let mut chapter_files = Vec::with_capacity(final_script.chapters.len());

        for (done, chapter) in final_script.chapters.iter().enumerate() {
            self.ensure_not_cancelled(id)?;
            let clips = self
                .synthesizer
                .synthesize_all(&chapter.utterances, scratch_dir)
                .await?;
            let chapter_file = self
                .assembler
                .assemble_chapter(chapter.chapter_number, &clips, scratch_dir)
                .await?;
            chapter_files.push(chapter_file);
            self.registry.update(id, |j| {
                j.progress.chapters_done = (done + 1) as u32;
                j.progress.chapters_total = total_chapters;
            })?;
        }

        let output_path = self.output_dir.join(format!("{id}.mp3"));
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| Error::internal(format!("could not create output dir: {e}")))?;
        self.assembler.assemble_final(&chapter_files, &output_path).await
    }

    /// Writes the job's artifact bundle to `{outputDir}/{jobId}-artifacts.json`
    /// (spec §4.10 step 5).
    async fn persist_artifacts(&self, id: JobId) -> Result<()> {
        let job = self
            .registry
            .get(id)
            .ok_or_else(|| Error::internal(format!("job {id} vanished before artifacts could be persisted")))?;
        let document = serde_json::to_vec_pretty(&job.artifacts)
            .map_err(|e| Error::internal(format!("could not serialize artifacts: {e}")))?;
        let path = self.output_dir.join(format!("{id}-artifacts.json"));
        tokio::fs::write(&path, document)
            .await
            .map_err(|e| Error::internal(format!("could not write artifacts: {e}")))
    }

    /// On failure: records the error (unless the job is already the
    /// terminal `cancelled` state, which accepts no further writes), then
    /// removes any partial final MP3 and artifact JSON (spec §4.10 step 7).
    async fn fail_job(&self, id: JobId, err: &Error) {
        if err.kind == podforge_core::ErrorKind::Cancelled {
            tracing::info!(job_id = %id, "job processing stopped at a stage boundary: cancelled");
        } else {
            tracing::error!(job_id = %id, error = %err, "job failed");
            let job_err = podforge_core::JobError::from(err);
            if let Err(update_err) = self.registry.update(id, |j| {
                j.error = Some(job_err);
                let _ = j.transition(JobState::Failed);
            }) {
                tracing::error!(job_id = %id, error = %update_err, "failed to record job failure");
            }
        }

        let mp3 = self.output_dir.join(format!("{id}.mp3"));
        let _ = tokio::fs::remove_file(&mp3).await;
        let json = self.output_dir.join(format!("{id}-artifacts.json"));
        let _ = tokio::fs::remove_file(&json).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podforge_core::{Mood, Style};

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.server.output_dir = "/tmp/podforge-test-output".to_string();
        settings.server.temp_dir = "/tmp/podforge-test-temp".to_string();
        settings
    }

    fn brief() -> Brief {
        Brief {
            topic: "bicycles".to_string(),
            focus: None,
            mood: Mood::Neutral,
            style: Style::Conversational,
            chapters: 2,
            duration_min: 5,
            source: None,
        }
    }

    struct UnusedFetcher;
    #[async_trait::async_trait]
    impl ContentFetcher for UnusedFetcher {
        async fn fetch(&self, _source: &str) -> Result<(String, String)> {
            Err(Error::internal("not used in this test"))
        }
    }

    struct UnusedAudioTool;
    #[async_trait::async_trait]
    impl AudioTool for UnusedAudioTool {
        async fn concat(&self, _clips: &[PathBuf], _output: &std::path::Path) -> Result<()> {
            Err(Error::audio("not used in this test"))
        }
        async fn probe(&self, _path: &std::path::Path) -> Result<podforge_core::AudioProperties> {
            Err(Error::audio("not used in this test"))
        }
    }

    #[test]
    fn accept_rejects_a_brief_that_violates_constraints() {
        let settings = settings();
        let registry = Arc::new(JobRegistry::new());
        let orchestrator =
            Orchestrator::new(&settings, registry, UnusedFetcher, UnusedAudioTool).unwrap();

        let mut bad_brief = brief();
        bad_brief.chapters = 99;
        assert!(orchestrator.accept(bad_brief, None).is_err());
    }

    #[test]
    fn accept_creates_a_queued_job_for_a_valid_brief() {
        let settings = settings();
        let registry = Arc::new(JobRegistry::new());
        let orchestrator =
            Orchestrator::new(&settings, registry, UnusedFetcher, UnusedAudioTool).unwrap();

        let job = orchestrator.accept(brief(), Some("req-1".to_string())).unwrap();
        assert_eq!(job.state, JobState::Queued);
        assert_eq!(orchestrator.get(job.id).unwrap().id, job.id);
    }

    #[test]
    fn validate_surfaces_estimates_without_creating_a_job() {
        let settings = settings();
        let registry = Arc::new(JobRegistry::new());
        let orchestrator =
            Orchestrator::new(&settings, registry.clone(), UnusedFetcher, UnusedAudioTool).unwrap();

        let report = orchestrator.validate(&brief());
        assert!(report.valid);
        assert_eq!(registry.list(10, 0).len(), 0);
    }
}
