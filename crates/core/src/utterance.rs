//! The Tone Annotator's (C6) output: sentence-level utterances carrying a
//! speaker, a tone tag, and the text to synthesize.

use serde::{Deserialize, Serialize};

use crate::sentence::split_sentences;
use crate::tone::Tone;

/// Which of the two hosts speaks a given utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Host1,
    Host2,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Host1 => "Host 1",
            Speaker::Host2 => "Host 2",
        }
    }
}

/// One sentence of dialogue, the unit the Speech Synthesizer (C8) turns
/// into a single TTS request (spec §3, §4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utterance {
    pub index: u32,
    pub chapter_number: u32,
    pub speaker: Speaker,
    pub tone: Tone,
    /// The tone tag exactly as it appeared in the tone-annotated script,
    /// preserved even when it was a legacy synonym resolved to `tone`
    /// (spec §9 Open Question: preserve, don't normalize away).
    pub original_tag: String,
    pub text: String,
}

/// Splits one tone-tagged dialogue line's spoken text into per-sentence
/// utterances, assigning sequential indices starting at `next_index`.
/// Returns the utterances and the next free index.
pub fn utterances_from_line(
    chapter_number: u32,
    speaker: Speaker,
    tone: Tone,
    original_tag: &str,
    spoken_text: &str,
    next_index: u32,
) -> (Vec<Utterance>, u32) {
    let mut index = next_index;
    let mut out = Vec::new();
    for sentence in split_sentences(spoken_text) {
        out.push(Utterance {
            index,
            chapter_number,
            speaker,
            tone,
            original_tag: original_tag.to_string(),
            text: sentence,
        });
        index += 1;
    }
    (out, index)
}

/// The full tone-annotated, two-host script for one chapter: markdown plus
/// its parsed utterances in speaking order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneScript {
    pub chapter_number: u32,
    pub markdown: String,
    pub utterances: Vec<Utterance>,
}

impl ToneScript {
    pub fn utterance_count(&self) -> usize {
        self.utterances.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_multi_sentence_line_into_separate_utterances() {
        let (utterances, next) = utterances_from_line(
            1,
            Speaker::Host1,
            Tone::Upbeat,
            "upbeat",
            "Hello there. How are you today?",
            0,
        );
        assert_eq!(utterances.len(), 2);
        assert_eq!(utterances[0].index, 0);
        assert_eq!(utterances[1].index, 1);
        assert_eq!(next, 2);
    }

    #[test]
    fn preserves_legacy_tag_text_alongside_resolved_tone() {
        let (utterances, _) = utterances_from_line(
            1,
            Speaker::Host2,
            Tone::Reflective,
            "sad",
            "That is unfortunate.",
            5,
        );
        assert_eq!(utterances[0].tone, Tone::Reflective);
        assert_eq!(utterances[0].original_tag, "sad");
    }

    #[test]
    fn indices_continue_across_calls() {
        let (first, next) =
            utterances_from_line(1, Speaker::Host1, Tone::Calm, "calm", "First line.", 0);
        let (second, next2) =
            utterances_from_line(1, Speaker::Host2, Tone::Calm, "calm", "Second line.", next);
        assert_eq!(first[0].index, 0);
        assert_eq!(second[0].index, 1);
        assert_eq!(next2, 2);
    }
}
