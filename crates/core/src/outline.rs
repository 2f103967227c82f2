//! The Outliner's (C4) output: a per-chapter section skeleton.

use serde::{Deserialize, Serialize};

/// One bullet under a chapter's "Key Points" / "Talking Points" heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineSection {
    pub heading: String,
    pub talking_points: Vec<String>,
    pub word_estimate: u32,
}

/// Parsed markdown skeleton for a single chapter, one entry per chapter
/// number in the Plan (spec §3, §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    pub chapter_number: u32,
    pub markdown: String,
    pub sections: Vec<OutlineSection>,
}

impl Outline {
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Sum of each section's word estimate, used by the Outliner to sanity
    /// check against the chapter's share of the budget before handing off
    /// to the Scripter.
    pub fn estimated_word_total(&self) -> u32 {
        self.sections.iter().map(|s| s.word_estimate).sum()
    }
}
