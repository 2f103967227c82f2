//! The Outliner (C4): turns the Plan into a section-by-section skeleton for
//! every chapter, one Scripter input apiece (spec §4.4).

use async_trait::async_trait;

use podforge_core::traits::{ModelBackend, StageAgent};
use podforge_core::word_budget::classify_accuracy;
use podforge_core::{Brief, Error, Plan, Result};
use podforge_llm::prompts::{outliner_system_prompt, to_messages};
use podforge_llm::retry_with_backoff;

use crate::outline_parser::{chapter_count_within_tolerance, parse_outline, ParsedOutline};

pub struct OutlinerInput {
    pub brief: Brief,
    pub plan: Plan,
}

pub struct Outliner<B: ModelBackend> {
    backend: B,
}

impl<B: ModelBackend> Outliner<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: ModelBackend> StageAgent<OutlinerInput, ParsedOutline> for Outliner<B> {
    async fn run(&self, input: OutlinerInput) -> Result<ParsedOutline> {
        let target_words = input.plan.word_budget.total_words;
        let system_prompt = outliner_system_prompt(&input.brief, target_words);
        let user_message = format!(
            "Chapter breakdown from the plan:\n{}",
            input.plan.markdown
        );
        let messages = to_messages(system_prompt, user_message);

        let raw = retry_with_backoff(self.stage_name(), || self.backend.generate(&messages))
            .await
            .map_err(|e| Error::agent(self.stage_name(), e.to_string()))?;

        let parsed = parse_outline(&raw, target_words);

        if !chapter_count_within_tolerance(input.brief.chapters, parsed.chapters.len()) {
            tracing::warn!(
                expected = input.brief.chapters,
                found = parsed.chapters.len(),
                "outline chapter count outside tolerance; continuing with what was parsed"
            );
        }

        for chapter in &parsed.chapters {
            let per_chapter_target = input.plan.word_budget.per_chapter;
            let accuracy = classify_accuracy(per_chapter_target, chapter.estimated_word_total());
            tracing::debug!(
                chapter = chapter.chapter_number,
                ?accuracy,
                "outline section-balance estimate"
            );
        }

        Ok(parsed)
    }

    fn stage_name(&self) -> &'static str {
        "outliner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podforge_core::traits::Message;
    use podforge_core::{Mood, Style, WordBudget};

    struct FixedBackend(&'static str);

    #[async_trait]
    impl ModelBackend for FixedBackend {
        async fn generate(&self, _messages: &[Message]) -> Result<String> {
            Ok(self.0.to_string())
        }
        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn brief() -> Brief {
        Brief {
            topic: "bicycles".to_string(),
            focus: None,
            mood: Mood::Neutral,
            style: Style::Conversational,
            chapters: 2,
            duration_min: 4,
            source: None,
        }
    }

    fn plan() -> Plan {
        Plan {
            markdown: "## Chapter Breakdown".to_string(),
            chapters: vec![],
            word_budget: WordBudget::derive(4, 2),
        }
    }

    #[tokio::test]
    async fn parses_outline_with_matching_chapter_count() {
        let markdown = "## Episode Overview\nIntro.\n\n\
                         ## Opening Hook\nHook.\n\n\
                         ## Chapter Outlines\n\n\
                         ### Chapter 1: Origins\n\
                         - Discussion Points: a; b\n\
                         - Narrative Purpose: set stage\n\n\
                         ### Chapter 2: Today\n\
                         - Discussion Points: c; d\n\
                         - Narrative Purpose: bring it home\n\n\
                         ## Closing Segment\nWrap up.\n\n\
                         ## Pacing Notes\nKeep it moving.";
        let outliner = Outliner::new(FixedBackend(markdown));
        let parsed = outliner
            .run(OutlinerInput {
                brief: brief(),
                plan: plan(),
            })
            .await
            .unwrap();
        assert_eq!(parsed.chapters.len(), 2);
    }
}
