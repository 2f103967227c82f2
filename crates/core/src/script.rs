//! The Scripter's (C5) output: one chapter's two-host dialogue draft,
//! produced and refined inside a word-budget convergence loop.

use serde::{Deserialize, Serialize};

use crate::word_budget::{spoken_word_count, Accuracy};

/// A single chapter's narrative draft, after zero or more revision passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterScript {
    pub chapter_number: u32,
    pub markdown: String,
    /// How many generate/revise passes this chapter took to settle, `0`
    /// meaning the first draft already landed within the strict per-stage
    /// tolerance (spec §4.5 convergence loop).
    pub revisions: u32,
    pub word_count: u32,
    pub accuracy: Accuracy,
}

/// The maximum number of generate/revise attempts before a chapter is
/// accepted as-is, over or under budget (spec §4.5).
pub const MAX_SCRIPT_REVISIONS: u32 = 3;

impl ChapterScript {
    pub fn new(chapter_number: u32, markdown: String, revisions: u32, target_words: u32) -> Self {
        let word_count = spoken_word_count(&markdown) as u32;
        let accuracy = crate::word_budget::classify_accuracy(target_words, word_count);
        Self {
            chapter_number,
            markdown,
            revisions,
            word_count,
            accuracy,
        }
    }

    pub fn converged(&self, target_words: u32, tolerance_pct: f32) -> bool {
        if target_words == 0 {
            return true;
        }
        let deviation =
            ((self.word_count as f32 - target_words as f32) / target_words as f32 * 100.0).abs();
        deviation <= tolerance_pct
    }

    pub fn exhausted_revisions(&self) -> bool {
        self.revisions >= MAX_SCRIPT_REVISIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converged_respects_tolerance() {
        let script = ChapterScript::new(
            1,
            "**Host 1:** one two\n**Host 2:** three four five".to_string(),
            0,
            5,
        );
        assert!(script.converged(5, 2.0));
    }

    #[test]
    fn exhausted_revisions_caps_at_three() {
        let script = ChapterScript::new(1, "**Host 1:** word".to_string(), 3, 100);
        assert!(script.exhausted_revisions());
        let fresh = ChapterScript::new(1, "**Host 1:** word".to_string(), 2, 100);
        assert!(!fresh.exhausted_revisions());
    }
}
