//! Core domain types, traits and errors shared by every crate in the
//! podcast generation pipeline, mirroring how the workspace's `core` crate
//! holds the vocabulary every other crate builds on rather than logic of
//! its own.

pub mod audio_artifact;
pub mod brief;
pub mod error;
pub mod final_script;
pub mod job;
pub mod markdown;
pub mod outline;
pub mod plan;
pub mod research;
pub mod script;
pub mod sentence;
pub mod tone;
pub mod traits;
pub mod utterance;
pub mod word_budget;

pub use audio_artifact::{AudioArtifact, AudioProperties, UtteranceClip};
pub use brief::{Brief, BriefConstraints, Mood, Style, ValidationWarning};
pub use error::{Error, ErrorKind, Result};
pub use final_script::FinalScript;
pub use job::{
    Job, JobArtifacts, JobError, JobId, JobMetadata, JobState, Stage, StageProgress, TOTAL_STEPS,
};
pub use outline::{Outline, OutlineSection};
pub use plan::{Plan, PlanChapter};
pub use research::ResearchNotes;
pub use script::ChapterScript;
pub use tone::Tone;
pub use traits::{AudioTool, ContentFetcher, Message, ModelBackend, Role, StageAgent, TextToSpeech};
pub use utterance::{Speaker, ToneScript, Utterance};
pub use word_budget::{Accuracy, WordBudget};
