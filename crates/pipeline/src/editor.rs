//! The Editor (C7): stitches every chapter's tone-annotated script into one
//! continuous document and trims/expands it to within the lenient ±5% final
//! tolerance, never failing the job over that tolerance alone (spec §4.7).

use async_trait::async_trait;

use podforge_core::final_script::MAX_EDITOR_REVISIONS;
use podforge_core::traits::{ModelBackend, StageAgent};
use podforge_core::{Error, FinalScript, Result, ToneScript};
use podforge_llm::prompts::{editor_correction, editor_system_prompt, to_messages};

use crate::convergence::run_convergence_loop;
use crate::tone_parser::parse_tone_document;

/// Placeholder markers that make a draft a genuine structural failure
/// rather than a lenient tolerance miss (spec §4.7).
const PLACEHOLDER_MARKERS: &[&str] = &["TODO", "[INSERT"];

const MIN_SCRIPT_LEN: usize = 100;

pub struct EditorInput {
    pub chapters: Vec<ToneScript>,
    pub target_words: f32,
}

pub struct Editor<B: ModelBackend> {
    backend: B,
}

impl<B: ModelBackend> Editor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

fn concatenate(chapters: &[ToneScript]) -> String {
    chapters
        .iter()
        .map(|c| format!("## Chapter {}\n{}", c.chapter_number, c.markdown))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn check_structural_sanity(stage: &'static str, markdown: &str) -> Result<()> {
    if markdown.trim().chars().count() < MIN_SCRIPT_LEN {
        return Err(Error::agent(
            stage,
            format!("final script is only {} characters, below the minimum", markdown.trim().chars().count()),
        ));
    }
    for marker in PLACEHOLDER_MARKERS {
        if markdown.contains(marker) {
            return Err(Error::agent(
                stage,
                format!("final script still contains a placeholder marker: {marker}"),
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl<B: ModelBackend> StageAgent<EditorInput, FinalScript> for Editor<B> {
    async fn run(&self, input: EditorInput) -> Result<FinalScript> {
        let target_words = input.target_words.round().max(0.0) as u32;
        let combined = concatenate(&input.chapters);

        let system_prompt = editor_system_prompt(target_words, 5.0);
        let messages = to_messages(system_prompt, combined);

        let outcome = run_convergence_loop(
            &self.backend,
            self.stage_name(),
            MAX_EDITOR_REVISIONS,
            messages,
            |raw, revisions| {
                check_structural_sanity(self.stage_name(), &raw)?;
                let tone_scripts = parse_tone_document(&raw);
                Ok(FinalScript::assemble(raw, tone_scripts, target_words, revisions))
            },
            |script: &FinalScript| script.within_tolerance(target_words, 5.0),
            |script: &FinalScript| editor_correction(script.word_count, target_words),
        )
        .await?;

        let script = outcome.value;
        if script.total_utterances() > 0 {
            let tagged = script
                .chapters
                .iter()
                .flat_map(|c| c.utterances.iter())
                .filter(|u| !u.original_tag.is_empty())
                .count();
            if tagged == 0 {
                tracing::warn!("final script has no tone tags at all; proceeding leniently");
            }
        }

        Ok(script)
    }

    fn stage_name(&self) -> &'static str {
        "editor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podforge_core::tone::Tone;
    use podforge_core::traits::Message;
    use podforge_core::utterance::{Speaker, Utterance};

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

    fn input() -> EditorInput {
        EditorInput {
            chapters: vec![ToneScript {
                chapter_number: 1,
                markdown: "**Host 1:** [calm] Hello there friend.".to_string(),
                utterances: vec![Utterance {
                    index: 0,
                    chapter_number: 1,
                    speaker: Speaker::Host1,
                    tone: Tone::Calm,
                    original_tag: "calm".to_string(),
                    text: "Hello there friend.".to_string(),
                }],
            }],
            target_words: 4.0,
        }
    }

    #[tokio::test]
    async fn rejects_placeholder_text_as_structural_failure() {
        let editor = Editor::new(FixedBackend(
            "## Chapter 1\n**Host 1:** [calm] TODO fill this in later with real dialogue text here.",
        ));
        let err = editor.run(input()).await.unwrap_err();
        assert_eq!(err.kind, podforge_core::ErrorKind::Agent);
    }

    #[tokio::test]
    async fn accepts_well_formed_stitched_script() {
        let markdown = "## Chapter 1\n\
                         **Host 1:** [calm] Hello there friend, it is good to see you today.\n\
                         **Host 2:** [upbeat] Likewise, I have been looking forward to this chat.";
        let editor = Editor::new(FixedBackend(markdown));
        let script = editor
            .run(EditorInput {
                chapters: input().chapters,
                target_words: 20.0,
            })
            .await
            .unwrap();
        assert!(script.total_utterances() > 0);
    }
}
