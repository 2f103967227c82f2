//! The user-submitted brief that parameterizes a generation job.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Desired emotional register for the whole episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Neutral,
    Excited,
    Calm,
    Reflective,
    Enthusiastic,
}

/// Narrative/structural style of the episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Storytelling,
    Conversational,
    Interview,
    Educational,
    Narrative,
}

impl Style {
    /// `narrative` falls through to `storytelling` guidance (spec §4.5).
    pub fn prompt_guidance_key(&self) -> Style {
        match self {
            Style::Narrative => Style::Storytelling,
            other => *other,
        }
    }
}

/// Immutable once a job is accepted (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brief {
    pub topic: String,
    pub focus: Option<String>,
    pub mood: Mood,
    pub style: Style,
    pub chapters: u32,
    pub duration_min: u32,
    pub source: Option<String>,
}

/// Soft issue surfaced by `validate()`, e.g. a chapter count far beyond
/// what the duration can comfortably support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

/// Constraints enumerated in spec.md §3 and §6 (`constraints.*`).
#[derive(Debug, Clone)]
pub struct BriefConstraints {
    pub min_chapters: u32,
    pub max_chapters: u32,
    pub min_duration_min: u32,
    pub max_duration_min: u32,
    pub max_topic_len: usize,
    pub max_focus_len: usize,
}

impl Default for BriefConstraints {
    fn default() -> Self {
        Self {
            min_chapters: 1,
            max_chapters: 10,
            min_duration_min: 1,
            max_duration_min: 120,
            max_topic_len: 500,
            max_focus_len: 1000,
        }
    }
}

impl Brief {
    /// Hard validation: any violation here rejects submission synchronously
    /// and no Job is ever created (spec §7 `validation`).
    pub fn validate(&self, constraints: &BriefConstraints) -> Result<Vec<ValidationWarning>> {
        if self.topic.trim().is_empty() {
            return Err(Error::validation("topic must not be empty"));
        }
        if self.topic.chars().count() > constraints.max_topic_len {
            return Err(Error::validation(format!(
                "topic exceeds {} characters",
                constraints.max_topic_len
            )));
        }
        if let Some(ref focus) = self.focus {
            if focus.chars().count() > constraints.max_focus_len {
                return Err(Error::validation(format!(
                    "focus exceeds {} characters",
                    constraints.max_focus_len
                )));
            }
        }
        if self.chapters < constraints.min_chapters || self.chapters > constraints.max_chapters {
            return Err(Error::validation(format!(
                "chapters must be between {} and {}",
                constraints.min_chapters, constraints.max_chapters
            )));
        }
        if self.duration_min < constraints.min_duration_min
            || self.duration_min > constraints.max_duration_min
        {
            return Err(Error::validation(format!(
                "durationMin must be between {} and {}",
                constraints.min_duration_min, constraints.max_duration_min
            )));
        }

        let mut warnings = Vec::new();
        if self.chapters > self.duration_min.saturating_mul(2) {
            warnings.push(ValidationWarning {
                field: "chapters".to_string(),
                message: format!(
                    "{} chapters is a lot for a {} minute episode; chapters will be short",
                    self.chapters, self.duration_min
                ),
            });
        }
        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief(topic: &str, chapters: u32, duration_min: u32) -> Brief {
        Brief {
            topic: topic.to_string(),
            focus: None,
            mood: Mood::Neutral,
            style: Style::Conversational,
            chapters,
            duration_min,
            source: None,
        }
    }

    #[test]
    fn empty_topic_is_rejected() {
        let b = brief("", 3, 5);
        let err = b.validate(&BriefConstraints::default()).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Validation);
    }

    #[test]
    fn chapters_out_of_range_is_rejected() {
        let b = brief("bicycles", 11, 5);
        assert!(b.validate(&BriefConstraints::default()).is_err());
    }

    #[test]
    fn excessive_chapters_for_duration_warns_but_accepts() {
        let b = brief("bicycles", 10, 3);
        let warnings = b.validate(&BriefConstraints::default()).unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn narrative_style_falls_through_to_storytelling() {
        assert_eq!(Style::Narrative.prompt_guidance_key(), Style::Storytelling);
        assert_eq!(
            Style::Conversational.prompt_guidance_key(),
            Style::Conversational
        );
    }
}
