//! The Scripter (C5): drafts one chapter's two-host dialogue within a
//! strict ±2% word-budget convergence loop, then the bounded fan-out that
//! runs every chapter's Scripter call concurrently while preserving chapter
//! order (spec §4.5, §4.1 "cap concurrent chapter generation at 5").

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use podforge_core::script::MAX_SCRIPT_REVISIONS;
use podforge_core::traits::{ModelBackend, StageAgent};
use podforge_core::{Brief, ChapterScript, Outline, Result, WordBudget};
use podforge_llm::prompts::{scripter_correction, scripter_system_prompt, to_messages};

use crate::convergence::run_convergence_loop;

/// Default cap on chapters generated concurrently (spec §4.1).
pub const DEFAULT_MAX_CONCURRENT_CHAPTERS: usize = 5;

pub struct ScripterInput {
    pub brief: Brief,
    pub outline: Outline,
    pub target_words: u32,
}

pub struct Scripter<B: ModelBackend> {
    backend: B,
}

impl<B: ModelBackend> Scripter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: ModelBackend> StageAgent<ScripterInput, ChapterScript> for Scripter<B> {
    async fn run(&self, input: ScripterInput) -> Result<ChapterScript> {
        let chapter_number = input.outline.chapter_number;
        let target_words = input.target_words;
        let talking_points: Vec<String> = input
            .outline
            .sections
            .iter()
            .flat_map(|s| s.talking_points.clone())
            .collect();

        let system_prompt = scripter_system_prompt(&input.brief, chapter_number, target_words);
        let user_message = format!(
            "Talking points for this chapter:\n{}",
            talking_points.join("\n- ")
        );
        let messages = to_messages(system_prompt, user_message);

        let outcome = run_convergence_loop(
            &self.backend,
            self.stage_name(),
            MAX_SCRIPT_REVISIONS,
            messages,
            |raw, revisions| Ok(ChapterScript::new(chapter_number, raw, revisions, target_words)),
            |script: &ChapterScript| script.converged(target_words, 2.0),
            |script: &ChapterScript| scripter_correction(script.word_count, target_words),
        )
        .await?;

        Ok(outcome.value)
    }

    fn stage_name(&self) -> &'static str {
        "scripter"
    }
}

/// Runs the Scripter over every chapter concurrently, capped at
/// `max_concurrent`, returning chapter scripts in the same order as
/// `outlines` regardless of completion order (spec §4.1, §4.5).
pub async fn generate_all<B: ModelBackend>(
    scripter: &Scripter<B>,
    brief: &Brief,
    outlines: Vec<Outline>,
    budget: WordBudget,
    max_concurrent: usize,
) -> Result<Vec<ChapterScript>> {
    let max_concurrent = max_concurrent.max(1);
    stream::iter(outlines.into_iter().map(|outline| {
        let target_words = if outline.estimated_word_total() > 0 {
            outline.estimated_word_total()
        } else {
            budget.per_chapter
        };
        scripter.run(ScripterInput {
            brief: brief.clone(),
            outline,
            target_words,
        })
    }))
    .buffered(max_concurrent)
    .collect::<Vec<_>>()
    .await
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use podforge_core::traits::Message;
    use podforge_core::{Mood, OutlineSection, Style};

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
            chapters: 1,
            duration_min: 1,
            source: None,
        }
    }

    fn outline(number: u32) -> Outline {
        Outline {
            chapter_number: number,
            markdown: String::new(),
            sections: vec![OutlineSection {
                heading: "Origins".to_string(),
                talking_points: vec!["early designs".to_string()],
                word_estimate: 5,
            }],
        }
    }

    #[tokio::test]
    async fn converges_immediately_when_within_tolerance() {
        let scripter = Scripter::new(FixedBackend("**Host 1:** one two\n**Host 2:** three four five"));
        let script = scripter
            .run(ScripterInput {
                brief: brief(),
                outline: outline(1),
                target_words: 5,
            })
            .await
            .unwrap();
        assert_eq!(script.revisions, 0);
        assert_eq!(script.word_count, 5);
    }

    #[tokio::test]
    async fn fan_out_preserves_chapter_order() {
        let scripter = Scripter::new(FixedBackend("**Host 1:** one two\n**Host 2:** three four five"));
        let outlines = vec![outline(1), outline(2), outline(3)];
        let budget = WordBudget::derive(3, 3);
        let scripts = generate_all(&scripter, &brief(), outlines, budget, 2)
            .await
            .unwrap();
        let numbers: Vec<u32> = scripts.iter().map(|s| s.chapter_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
