//! Brief constraint configuration (spec §6 `constraints.*` keys).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintsConfig {
    #[serde(default = "default_min_chapters")]
    pub min_chapters: u32,
    #[serde(default = "default_max_chapters")]
    pub max_chapters: u32,
    #[serde(default = "default_min_duration_min")]
    pub min_duration_min: u32,
    #[serde(default = "default_max_duration_min")]
    pub max_duration_min: u32,
    #[serde(default = "default_max_topic_length")]
    pub max_topic_length: usize,
    #[serde(default = "default_max_focus_length")]
    pub max_focus_length: usize,
}

fn default_min_chapters() -> u32 {
    1
}
fn default_max_chapters() -> u32 {
    10
}
fn default_min_duration_min() -> u32 {
    1
}
fn default_max_duration_min() -> u32 {
    120
}
fn default_max_topic_length() -> usize {
    500
}
fn default_max_focus_length() -> usize {
    1000
}

impl Default for ConstraintsConfig {
    fn default() -> Self {
        Self {
            min_chapters: default_min_chapters(),
            max_chapters: default_max_chapters(),
            min_duration_min: default_min_duration_min(),
            max_duration_min: default_max_duration_min(),
            max_topic_length: default_max_topic_length(),
            max_focus_length: default_max_focus_length(),
        }
    }
}

impl From<&ConstraintsConfig> for podforge_core::BriefConstraints {
    fn from(cfg: &ConstraintsConfig) -> Self {
        Self {
            min_chapters: cfg.min_chapters,
            max_chapters: cfg.max_chapters,
            min_duration_min: cfg.min_duration_min,
            max_duration_min: cfg.max_duration_min,
            max_topic_len: cfg.max_topic_length,
            max_focus_len: cfg.max_focus_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_brief_constraints_default() {
        let cfg = ConstraintsConfig::default();
        let constraints: podforge_core::BriefConstraints = (&cfg).into();
        let expected = podforge_core::BriefConstraints::default();
        assert_eq!(constraints.min_chapters, expected.min_chapters);
        assert_eq!(constraints.max_chapters, expected.max_chapters);
        assert_eq!(constraints.max_duration_min, expected.max_duration_min);
    }
}
