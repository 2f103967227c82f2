//! The Tone Annotator (C6): concatenates every chapter's script under a
//! `## Chapter N` heading, asks the model to insert tone tags without
//! touching the wording, then parses the result back into per-chapter
//! `ToneScript`s (spec §4.6).

use async_trait::async_trait;

use podforge_core::tone::Tone;
use podforge_core::traits::{ModelBackend, StageAgent};
use podforge_core::{ChapterScript, Error, Result, ToneScript};
use podforge_llm::prompts::{to_messages, tone_annotator_system_prompt};
use podforge_llm::retry_with_backoff;

use crate::tone_parser::parse_tone_document;

pub struct ToneAnnotator<B: ModelBackend> {
    backend: B,
}

impl<B: ModelBackend> ToneAnnotator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

fn concatenate_chapters(scripts: &[ChapterScript]) -> String {
    scripts
        .iter()
        .map(|s| format!("## Chapter {}\n{}", s.chapter_number, s.markdown))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl<B: ModelBackend> StageAgent<Vec<ChapterScript>, Vec<ToneScript>> for ToneAnnotator<B> {
    async fn run(&self, chapters: Vec<ChapterScript>) -> Result<Vec<ToneScript>> {
        if chapters.is_empty() {
            return Err(Error::agent(self.stage_name(), "no chapters to annotate"));
        }

        let combined = concatenate_chapters(&chapters);
        let messages = to_messages(tone_annotator_system_prompt(), combined);

        let raw = retry_with_backoff(self.stage_name(), || self.backend.generate(&messages))
            .await
            .map_err(|e| Error::agent(self.stage_name(), e.to_string()))?;

        let tone_scripts = parse_tone_document(&raw);

        let total_utterances: usize = tone_scripts.iter().map(|s| s.utterance_count()).sum();
        if total_utterances == 0 {
            return Err(Error::agent(
                self.stage_name(),
                "tone-annotated script produced no utterances",
            ));
        }

        log_emotional_arc(&tone_scripts);

        Ok(tone_scripts)
    }

    fn stage_name(&self) -> &'static str {
        "tone_annotator"
    }
}

/// Advisory-only emotional-arc summary: the dominant tone across each third
/// of the episode's utterance sequence, logged for observability rather than
/// enforced as an invariant (spec §4.6).
fn log_emotional_arc(tone_scripts: &[ToneScript]) {
    let all_tones: Vec<Tone> = tone_scripts
        .iter()
        .flat_map(|s| s.utterances.iter().map(|u| u.tone))
        .collect();
    if all_tones.is_empty() {
        return;
    }
    let third = (all_tones.len() / 3).max(1);
    let thirds = [
        &all_tones[0..third.min(all_tones.len())],
        &all_tones[third.min(all_tones.len())..(2 * third).min(all_tones.len())],
        &all_tones[(2 * third).min(all_tones.len())..],
    ];
    for (i, segment) in thirds.iter().enumerate() {
        if let Some(dominant) = dominant_tone(segment) {
            tracing::info!(segment = i + 1, tone = dominant.as_str(), "emotional arc segment");
        }
    }
}

fn dominant_tone(tones: &[Tone]) -> Option<Tone> {
    if tones.is_empty() {
        return None;
    }
    let mut counts: Vec<(Tone, usize)> = Vec::new();
    for &tone in tones {
        match counts.iter_mut().find(|(t, _)| *t == tone) {
            Some((_, count)) => *count += 1,
            None => counts.push((tone, 1)),
        }
    }
    counts.into_iter().max_by_key(|(_, count)| *count).map(|(t, _)| t)
}
