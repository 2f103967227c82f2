//! The closed tone set and its historical synonyms (spec §3, §9).

use serde::{Deserialize, Serialize};

/// Bracketed tone tag directing expressive delivery of one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Upbeat,
    Calm,
    Excited,
    Reflective,
    Suspenseful,
    Skeptical,
    Humorous,
    Serious,
    Curious,
    Confident,
}

impl Tone {
    /// Parses a tone tag, accepting the closed set plus the historical
    /// synonyms the source format tolerates. Synonyms map onto a closed-set
    /// tone for voice synthesis purposes but the original tag text is kept
    /// by the caller (see `Utterance::original_tag`) rather than discarded —
    /// the Open Question in spec §9 decided to preserve, not normalize.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "upbeat" => Some(Tone::Upbeat),
            "calm" => Some(Tone::Calm),
            "excited" => Some(Tone::Excited),
            "reflective" => Some(Tone::Reflective),
            "suspenseful" => Some(Tone::Suspenseful),
            "skeptical" => Some(Tone::Skeptical),
            "humorous" => Some(Tone::Humorous),
            "serious" => Some(Tone::Serious),
            "curious" => Some(Tone::Curious),
            "confident" => Some(Tone::Confident),
            // Legacy synonyms: accepted by the parser, mapped to the closest
            // closed-set tone. Voice synthesis never sees which branch fired.
            "sad" => Some(Tone::Reflective),
            "hopeful" => Some(Tone::Upbeat),
            "empathetic" => Some(Tone::Calm),
            "angry" => Some(Tone::Serious),
            _ => None,
        }
    }

    pub fn is_legacy_synonym(raw: &str) -> bool {
        matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "sad" | "hopeful" | "empathetic" | "angry"
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Upbeat => "upbeat",
            Tone::Calm => "calm",
            Tone::Excited => "excited",
            Tone::Reflective => "reflective",
            Tone::Suspenseful => "suspenseful",
            Tone::Skeptical => "skeptical",
            Tone::Humorous => "humorous",
            Tone::Serious => "serious",
            Tone::Curious => "curious",
            Tone::Confident => "confident",
        }
    }
}
