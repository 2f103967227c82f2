//! The Planner's (C2) output: word budget, chapter skeleton, tone plan.

use serde::{Deserialize, Serialize};

use crate::word_budget::WordBudget;

/// One chapter entry parsed out of the Plan's "Chapter Breakdown" section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanChapter {
    pub number: u32,
    pub title: String,
    pub word_estimate: u32,
    pub key_points: Vec<String>,
    pub purpose: String,
    pub research_focus: String,
}

/// Parsed representation of the Plan markdown (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub markdown: String,
    pub chapters: Vec<PlanChapter>,
    pub word_budget: WordBudget,
}

impl Plan {
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }
}
