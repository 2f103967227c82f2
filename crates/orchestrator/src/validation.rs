//! The `validate(brief)` job-API surface (spec §6): runs the same hard
//! constraint checks `submit` would, but returns a report instead of
//! creating a job, plus estimates a caller can show before committing.

use podforge_core::{Brief, BriefConstraints, ValidationWarning, WordBudget};
use podforge_config::PerformanceConfig;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimates {
    pub target_words: u32,
    pub words_per_chapter: u32,
    pub estimated_duration_sec: u32,
    /// Soft wall-clock ETA, not a hard timeout (spec §5 "12x durationMin").
    pub processing_time_sec: u64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub warnings: Vec<ValidationWarning>,
    pub recommendations: Vec<String>,
    pub estimates: Estimates,
}

/// Soft, non-blocking style/duration advice layered on top of the hard
/// constraint check in `Brief::validate` (spec §6 `validate` "recommendations").
fn recommendations_for(brief: &Brief) -> Vec<String> {
    let mut out = Vec::new();
    if brief.duration_min <= 2 && brief.chapters > 1 {
        out.push(
            "a single chapter reads more naturally for episodes under two minutes".to_string(),
        );
    }
    if brief.focus.is_none() {
        out.push(
            "a narrower focus than just the topic tends to produce a sharper outline".to_string(),
        );
    }
    out
}

/// Validates `brief` against `constraints` without creating a job (spec §6,
/// §8 "a brief violating any enumerated constraint returns `validation`
/// without creating a Job"). Returns `Ok` with `valid: false` rather than
/// an error: `validate` is advisory, unlike `submit`.
pub fn validate_brief(
    brief: &Brief,
    constraints: &BriefConstraints,
    performance: &PerformanceConfig,
) -> ValidationReport {
    let (valid, warnings) = match brief.validate(constraints) {
        Ok(warnings) => (true, warnings),
        Err(err) => (
            false,
            vec![ValidationWarning {
                field: "brief".to_string(),
                message: err.message,
            }],
        ),
    };

    let budget = WordBudget::derive(brief.duration_min, brief.chapters);
    let estimates = Estimates {
        target_words: budget.total_words,
        words_per_chapter: budget.per_chapter,
        estimated_duration_sec: brief.duration_min * 60,
        processing_time_sec: PerformanceConfig::soft_wall_clock_budget_secs(brief.duration_min),
    };
    let _ = performance;

    ValidationReport {
        valid,
        warnings,
        recommendations: recommendations_for(brief),
        estimates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podforge_core::{Mood, Style};

    fn brief() -> Brief {
        Brief {
            topic: "bicycles".to_string(),
            focus: None,
            mood: Mood::Neutral,
            style: Style::Conversational,
            chapters: 3,
            duration_min: 5,
            source: None,
        }
    }

    #[test]
    fn valid_brief_reports_estimates() {
        let report = validate_brief(&brief(), &BriefConstraints::default(), &PerformanceConfig::default());
        assert!(report.valid);
        assert_eq!(report.estimates.target_words, 750);
        assert_eq!(report.estimates.words_per_chapter, 250);
    }

    #[test]
    fn invalid_brief_is_reported_not_erred() {
        let mut b = brief();
        b.chapters = 99;
        let report = validate_brief(&b, &BriefConstraints::default(), &PerformanceConfig::default());
        assert!(!report.valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn short_single_chapter_brief_has_no_chapter_count_recommendation() {
        let mut b = brief();
        b.chapters = 1;
        b.focus = Some("19th century transport".to_string());
        let report = validate_brief(&b, &BriefConstraints::default(), &PerformanceConfig::default());
        assert!(report.recommendations.is_empty());
    }
}
