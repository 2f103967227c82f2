//! The Researcher (C3): produces factual notes, either by grounding
//! deterministically in a supplied source document or by invoking the
//! model (spec §4.3).

use async_trait::async_trait;

use podforge_core::markdown::check_required_sections;
use podforge_core::traits::{ContentFetcher, ModelBackend, StageAgent};
use podforge_core::{Brief, Error, ResearchNotes, Result};
use podforge_llm::prompts::{researcher_system_prompt, to_messages};
use podforge_llm::retry_with_backoff;

const REQUIRED_SECTIONS: &[&str] = &["executive summary", "key facts", "main themes"];

/// Minimum fetched word count for source grounding to replace a model call
/// (spec §4.3, §8 "a source that is fetchable and >=50 words").
const MIN_SOURCE_WORDS: usize = 50;

pub struct ResearcherInput {
    pub brief: Brief,
    pub plan_markdown: String,
}

pub struct Researcher<B: ModelBackend, F: ContentFetcher> {
    backend: B,
    fetcher: F,
}

impl<B: ModelBackend, F: ContentFetcher> Researcher<B, F> {
    pub fn new(backend: B, fetcher: F) -> Self {
        Self { backend, fetcher }
    }
}

#[async_trait]
impl<B: ModelBackend, F: ContentFetcher> StageAgent<ResearcherInput, ResearchNotes>
    for Researcher<B, F>
{
    async fn run(&self, input: ResearcherInput) -> Result<ResearchNotes> {
        if let Some(source) = &input.brief.source {
            match self.fetcher.fetch(source).await {
                Ok((title, body)) if body.split_whitespace().count() >= MIN_SOURCE_WORDS => {
                    tracing::info!(source, "research grounded in supplied source, skipping model call");
                    return Ok(ResearchNotes::from_fetched(&title, &body));
                }
                Ok((_, body)) => {
                    tracing::debug!(
                        source,
                        words = body.split_whitespace().count(),
                        "source too short to ground research on; falling back to the model"
                    );
                }
                Err(err) => {
                    tracing::warn!(source, error = %err, "source fetch failed; falling back to the model");
                }
            }
        }

        let system_prompt = researcher_system_prompt(&input.brief, &input.plan_markdown);
        let messages = to_messages(
            system_prompt,
            format!("Research topic: {}", input.brief.topic),
        );

        let raw = retry_with_backoff(self.stage_name(), || self.backend.generate(&messages))
            .await
            .map_err(|e| Error::agent(self.stage_name(), e.to_string()))?;

        let check = check_required_sections(&raw, REQUIRED_SECTIONS);
        if check.missing.len() > 2 {
            return Err(Error::agent(
                self.stage_name(),
                format!("ResearchNotes is missing all required sections: {:?}", check.missing),
            ));
        }
        if !check.is_valid() {
            tracing::warn!(missing = ?check.missing, "research notes missing some sections, proceeding leniently");
        }

        Ok(ResearchNotes::from_model(raw))
    }

    fn stage_name(&self) -> &'static str {
        "researcher"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podforge_core::traits::Message;
    use podforge_core::{Mood, Style};

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

    struct FixedFetcher(Result<(String, String)>);

    #[async_trait]
    impl ContentFetcher for FixedFetcher {
        async fn fetch(&self, _source: &str) -> Result<(String, String)> {
            match &self.0 {
                Ok(pair) => Ok(pair.clone()),
                Err(e) => Err(e.clone()),
            }
        }
    }

    fn brief(source: Option<&str>) -> Brief {
        Brief {
            topic: "bicycles".to_string(),
            focus: None,
            mood: Mood::Neutral,
            style: Style::Conversational,
            chapters: 1,
            duration_min: 1,
            source: source.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn grounds_in_source_and_skips_model_when_long_enough() {
        let long_body = "word ".repeat(60);
        let researcher = Researcher::new(
            FixedBackend("should never be used"),
            FixedFetcher(Ok(("A Source".to_string(), long_body))),
        );
        let notes = researcher
            .run(ResearcherInput {
                brief: brief(Some("some/path.md")),
                plan_markdown: String::new(),
            })
            .await
            .unwrap();
        assert!(notes.grounded_in_source);
        assert!(notes.markdown.contains("A Source"));
    }

    #[tokio::test]
    async fn falls_back_to_model_when_source_too_short() {
        let researcher = Researcher::new(
            FixedBackend("## Executive Summary\nstuff\n## Key Facts\nmore\n## Main Themes\nyet more"),
            FixedFetcher(Ok(("Short".to_string(), "only a few words".to_string()))),
        );
        let notes = researcher
            .run(ResearcherInput {
                brief: brief(Some("some/path.md")),
                plan_markdown: String::new(),
            })
            .await
            .unwrap();
        assert!(!notes.grounded_in_source);
    }

    #[tokio::test]
    async fn no_source_calls_model_directly() {
        let researcher = Researcher::new(
            FixedBackend("## Executive Summary\nstuff\n## Key Facts\nmore\n## Main Themes\nyet more"),
            FixedFetcher(Err(Error::internal("unused"))),
        );
        let notes = researcher
            .run(ResearcherInput {
                brief: brief(None),
                plan_markdown: String::new(),
            })
            .await
            .unwrap();
        assert!(!notes.grounded_in_source);
    }

    #[tokio::test]
    async fn model_response_missing_all_sections_fails() {
        let researcher = Researcher::new(
            FixedBackend("nothing useful here"),
            FixedFetcher(Err(Error::internal("unused"))),
        );
        let err = researcher
            .run(ResearcherInput {
                brief: brief(None),
                plan_markdown: String::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, podforge_core::ErrorKind::Agent);
    }
}
