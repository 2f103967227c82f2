//! Job identity and the state machine the Orchestrator (C10) and Job
//! Registry (C11) drive a submission through (spec §3, §4.10, §4.11).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audio_artifact::AudioArtifact;
use crate::brief::Brief;
use crate::error::Error;
use crate::final_script::FinalScript;
use crate::outline::Outline;
use crate::plan::Plan;
use crate::research::ResearchNotes;
use crate::script::ChapterScript;
use crate::utterance::ToneScript;
use crate::word_budget::Accuracy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The named stage currently executing or last attempted, surfaced in
/// progress callbacks and `GET /jobs/{id}` responses (spec §4.10, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Planning,
    Research,
    Outline,
    Scripting,
    ToneAnnotation,
    Editing,
    Synthesis,
    Assembly,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Planning => "planning",
            Stage::Research => "research",
            Stage::Outline => "outline",
            Stage::Scripting => "scripting",
            Stage::ToneAnnotation => "tone_annotation",
            Stage::Editing => "editing",
            Stage::Synthesis => "synthesis",
            Stage::Assembly => "assembly",
        }
    }

    /// Stage order fixed by the pipeline (spec §1 overview); used to
    /// compute a coarse percent-complete for progress reporting.
    pub const ORDER: [Stage; 8] = [
        Stage::Planning,
        Stage::Research,
        Stage::Outline,
        Stage::Scripting,
        Stage::ToneAnnotation,
        Stage::Editing,
        Stage::Synthesis,
        Stage::Assembly,
    ];

    pub fn percent_complete(&self) -> u8 {
        let position = Self::ORDER.iter().position(|s| s == self).unwrap_or(0);
        (((position + 1) as f32 / Self::ORDER.len() as f32) * 100.0) as u8
    }
}

/// Encoded as an enum, not a string, per the spec's explicit instruction
/// that the state machine must be closed and checked by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Cancelled
        )
    }

    /// Valid forward transitions (spec §4.10/§4.11 "Design Notes": a closed
    /// state machine, no back-edges, terminal states are sinks).
    pub fn can_transition_to(&self, next: JobState) -> bool {
        use JobState::*;
        match (self, next) {
            (Queued, Processing) => true,
            (Queued, Cancelled) => true,
            (Processing, Completed) => true,
            (Processing, Failed) => true,
            (Processing, Cancelled) => true,
            _ => false,
        }
    }
}

/// A running record of how far a job's chapters have progressed through
/// the fan-out stages, for progress reporting (spec §4.10). `steps_completed`
/// / `total_steps` mirror the seven named stages of spec §1 (Planner through
/// TTS); `chapters_done`/`chapters_total` additionally track fan-out
/// progress within a stage such as the Scripter's bounded-parallel pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageProgress {
    pub stage: Option<Stage>,
    pub chapters_done: u32,
    pub chapters_total: u32,
    pub steps_completed: u32,
    pub total_steps: u32,
}

/// Stage count surfaced in `Job.progress.totalSteps` (spec §3: "totalSteps=7"
/// — Planner, Researcher, Outliner, Scripter, Tone Annotator, Editor,
/// Speech Synthesizer; Audio Assembly is folded into the TTS step for
/// client-facing progress reporting, matching the spec's own tally).
pub const TOTAL_STEPS: u32 = 7;

impl Default for StageProgress {
    fn default() -> Self {
        Self {
            stage: None,
            chapters_done: 0,
            chapters_total: 0,
            steps_completed: 0,
            total_steps: TOTAL_STEPS,
        }
    }
}

/// The agent-produced handoff documents accumulated as a job progresses,
/// keyed by stage (spec §3 "Ownership summary", §8 "artifact JSON has six
/// keys"). Populated incrementally by the Orchestrator as each stage
/// completes; exposed read-only via `GET /jobs/{id}/artifacts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobArtifacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchNotes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<Vec<Outline>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Vec<ChapterScript>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_script: Option<Vec<ToneScript>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_script: Option<FinalScript>,
}

/// Summary statistics computed once a job reaches `completed` (spec §4.10
/// step 4: "On success, compute metadata").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetadata {
    pub duration_sec: f32,
    pub word_count: u32,
    pub chapters: u32,
    pub actual_words_per_minute: f32,
    pub accuracy: Accuracy,
    pub generation_time_ms: u64,
}

/// A submitted generation job as tracked by the Job Registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Correlation id for log/tracing spans, populated by the server crate;
    /// never consulted by the state machine itself (spec §3 "used only for
    /// log correlation").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub brief: Brief,
    pub state: JobState,
    pub progress: StageProgress,
    pub artifacts: JobArtifacts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<AudioArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JobMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Stable, serializable projection of `core::Error` stored on a failed job;
/// the rich `Error` type itself is not `Serialize` (its constructors favor
/// ergonomics over wire format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobError {
    pub kind: crate::error::ErrorKind,
    pub message: String,
    pub stage: Option<String>,
}

impl From<&Error> for JobError {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind,
            message: err.message.clone(),
            stage: err.stage.clone(),
        }
    }
}

/// How long a completed/failed/cancelled job's artifacts remain retrievable
/// before the registry's sweep evicts them (spec §4.11).
pub const JOB_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

impl Job {
    pub fn new(brief: Brief) -> Self {
        Self {
            id: JobId::new(),
            request_id: None,
            brief,
            state: JobState::Queued,
            progress: StageProgress::default(),
            artifacts: JobArtifacts::default(),
            artifact: None,
            metadata: None,
            error: None,
            created_at: chrono::Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Transitions the job's state, stamping `started_at`/`completed_at` as
    /// the corresponding edges are crossed (spec §3 Job lifecycle).
    pub fn transition(&mut self, next: JobState) -> crate::error::Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(Error::internal(format!(
                "invalid job transition {:?} -> {:?}",
                self.state, next
            )));
        }
        if next == JobState::Processing {
            self.started_at = Some(chrono::Utc::now());
        }
        if next.is_terminal() {
            self.completed_at = Some(chrono::Utc::now());
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::{Mood, Style};

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

    #[test]
    fn queued_can_move_to_processing_or_cancelled_only() {
        assert!(JobState::Queued.can_transition_to(JobState::Processing));
        assert!(JobState::Queued.can_transition_to(JobState::Cancelled));
        assert!(!JobState::Queued.can_transition_to(JobState::Completed));
    }

    #[test]
    fn terminal_states_accept_no_further_transitions() {
        assert!(!JobState::Completed.can_transition_to(JobState::Processing));
        assert!(JobState::Completed.is_terminal());
    }

    #[test]
    fn job_transition_enforces_state_machine() {
        let mut job = Job::new(brief());
        job.transition(JobState::Processing).unwrap();
        assert_eq!(job.state, JobState::Processing);
        let err = job.transition(JobState::Queued).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Internal);
    }

    #[test]
    fn stage_percent_complete_increases_monotonically() {
        assert!(Stage::Planning.percent_complete() < Stage::Assembly.percent_complete());
        assert_eq!(Stage::Assembly.percent_complete(), 100);
    }

    #[test]
    fn transition_stamps_started_and_completed_timestamps() {
        let mut job = Job::new(brief()).with_request_id("req-1");
        assert!(job.started_at.is_none());
        job.transition(JobState::Processing).unwrap();
        assert!(job.started_at.is_some());
        assert!(job.completed_at.is_none());
        job.transition(JobState::Completed).unwrap();
        assert!(job.completed_at.is_some());
        assert_eq!(job.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn new_job_defaults_to_seven_total_steps_and_empty_artifacts() {
        let job = Job::new(brief());
        assert_eq!(job.progress.total_steps, TOTAL_STEPS);
        assert_eq!(job.progress.steps_completed, 0);
        assert!(job.artifacts.plan.is_none());
    }
}
