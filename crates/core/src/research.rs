//! The Researcher's (C3) output.

use serde::{Deserialize, Serialize};

/// Markdown with at minimum Executive Summary, Key Facts & Statistics, and
/// Main Themes & Perspectives (spec §3). If a `source` was supplied and
/// fetched successfully, this is a deterministic wrapper of the fetched text
/// rather than a model-authored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchNotes {
    pub markdown: String,
    /// True when this document was built by wrapping fetched source text
    /// rather than by invoking the model (spec §4.3, §8 "zero model calls").
    pub grounded_in_source: bool,
}

const PREAMBLE: &str = "## Executive Summary\n\nThis research is grounded in the supplied source material.\n";

impl ResearchNotes {
    /// Deterministic wrapper used when a `source` was supplied and fetched
    /// successfully (spec §4.3: "do not call the model").
    pub fn from_fetched(title: &str, body: &str) -> Self {
        let markdown = format!(
            "{preamble}\n## Key Facts & Statistics\n\nSee source body below.\n\n## Main Themes & Perspectives\n\n# {title}\n\n{body}",
            preamble = PREAMBLE,
            title = title,
            body = body,
        );
        Self {
            markdown,
            grounded_in_source: true,
        }
    }

    pub fn from_model(markdown: String) -> Self {
        Self {
            markdown,
            grounded_in_source: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fetched_embeds_title_and_body_verbatim() {
        let notes = ResearchNotes::from_fetched("The Wheel", "Body text about wheels.");
        assert!(notes.markdown.contains("The Wheel"));
        assert!(notes.markdown.contains("Body text about wheels."));
        assert!(notes.grounded_in_source);
    }
}
