//! The Planner (C2): derives the word budget and drafts the chapter
//! skeleton + tone plan for the whole episode (spec §4.2).

use async_trait::async_trait;

use podforge_core::traits::{ModelBackend, StageAgent};
use podforge_core::{Brief, Error, Plan, Result, WordBudget};
use podforge_llm::prompts::{planner_system_prompt, to_messages};
use podforge_llm::retry_with_backoff;

use crate::plan_parser::parse_plan;

pub struct Planner<B: ModelBackend> {
    backend: B,
}

impl<B: ModelBackend> Planner<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: ModelBackend> StageAgent<Brief, Plan> for Planner<B> {
    async fn run(&self, brief: Brief) -> Result<Plan> {
        let budget = WordBudget::derive(brief.duration_min, brief.chapters);
        let system_prompt = planner_system_prompt(&brief, budget.total_words);
        let user_message = format!(
            "Topic: {topic}\nFocus: {focus}\nMood: {mood:?}\nStyle: {style:?}",
            topic = brief.topic,
            focus = brief.focus.as_deref().unwrap_or("none specified"),
            mood = brief.mood,
            style = brief.style,
        );
        let messages = to_messages(system_prompt, user_message);

        let raw = retry_with_backoff(self.stage_name(), || self.backend.generate(&messages))
            .await
            .map_err(|e| Error::agent(self.stage_name(), e.to_string()))?;

        parse_plan(&raw, brief.chapters, budget)
    }

    fn stage_name(&self) -> &'static str {
        "planner"
    }
}
