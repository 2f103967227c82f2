//! The Tone Annotator's (C6) tolerant three-tier parser (spec §4.6, §9
//! "Markdown-as-IPC"): strict regex, then a legacy shape, then
//! line-by-line host matching with content-inferred tone. Each tier is
//! tried in order; the first to yield any spans wins, so tolerance never
//! silently drops an utterance in favor of a worse-but-still-valid parse.

use regex::Regex;

use podforge_core::tone::Tone;
use podforge_core::utterance::{utterances_from_line, Speaker, ToneScript, Utterance};

/// One parsed dialogue turn before sentence splitting.
struct Span {
    speaker: Speaker,
    tone: Tone,
    original_tag: String,
    text: String,
}

fn strict_regex() -> Regex {
    Regex::new(r"(?m)^\s*\*\*Host\s*([12])\s*:\*\*\s*\[([^\]]+)\]\s*(.+?)\s*$").unwrap()
}

fn legacy_regex() -> Regex {
    Regex::new(r"(?m)^\s*\*\*([A-Za-z]+)\*\*\s*(.+?)\s*$").unwrap()
}

fn host_only_regex() -> Regex {
    Regex::new(r"(?m)^\s*\*\*Host\s*([12])\s*:\*\*\s*(.+?)\s*$").unwrap()
}

/// Tier a: strict `**Host N:** [tone] text` spans (spec §4.6 step 3a). A
/// line that matches the strict shape but carries a tag outside the closed
/// tone set (and its legacy synonyms) still keeps its utterance: the tone is
/// inferred from content instead of being silently dropped, since tolerance
/// must never drop an utterance just because one sibling line's tag didn't
/// parse (spec §9 "Markdown-as-IPC").
fn try_strict(body: &str) -> Vec<Span> {
    strict_regex()
        .captures_iter(body)
        .filter_map(|cap| {
            let speaker = match &cap[1] {
                "1" => Speaker::Host1,
                "2" => Speaker::Host2,
                _ => return None,
            };
            let raw_tag = cap[2].trim().to_string();
            let text = cap[3].trim().to_string();
            let tone = Tone::parse(&raw_tag).unwrap_or_else(|| infer_tone(&text));
            Some(Span {
                speaker,
                tone,
                original_tag: raw_tag,
                text,
            })
        })
        .collect()
}

/// Tier b: legacy `**[tone]** text` spans, alternating speakers starting
/// with Host 1 (spec §4.6 step 3b).
fn try_legacy(body: &str) -> Vec<Span> {
    let mut next_speaker = Speaker::Host1;
    legacy_regex()
        .captures_iter(body)
        .filter_map(|cap| {
            let raw_tag = cap[1].trim().to_string();
            let tone = Tone::parse(&raw_tag)?;
            let speaker = next_speaker;
            next_speaker = match next_speaker {
                Speaker::Host1 => Speaker::Host2,
                Speaker::Host2 => Speaker::Host1,
            };
            Some(Span {
                speaker,
                tone,
                original_tag: raw_tag,
                text: cap[2].trim().to_string(),
            })
        })
        .collect()
}

/// Tier c: line-by-line host match with tone inferred from content
/// keywords (spec §4.6 step 3c).
fn try_inferred(body: &str) -> Vec<Span> {
    host_only_regex()
        .captures_iter(body)
        .map(|cap| {
            let speaker = if &cap[1] == "1" {
                Speaker::Host1
            } else {
                Speaker::Host2
            };
            let text = cap[2].trim().to_string();
            let tone = infer_tone(&text);
            Span {
                speaker,
                tone,
                original_tag: tone.as_str().to_string(),
                text,
            }
        })
        .collect()
}

/// Keyword-based tone inference, tried in the order listed in spec §4.6
/// step 3c; falls through to `calm` when nothing matches.
fn infer_tone(text: &str) -> Tone {
    let lower = text.to_ascii_lowercase();
    const POSITIVE_SUPERLATIVES: &[&str] = &["amazing", "incredible", "fantastic", "best"];
    if text.contains('!') || POSITIVE_SUPERLATIVES.iter().any(|w| lower.contains(w)) {
        return Tone::Excited;
    }
    const CURIOSITY_VERBS: &[&str] = &["wonder", "curious", "imagine"];
    if text.contains('?') || CURIOSITY_VERBS.iter().any(|w| lower.contains(w)) {
        return Tone::Curious;
    }
    if ["however", "consider", "reflect"].iter().any(|w| lower.contains(w)) {
        return Tone::Reflective;
    }
    if ["doubt", "really", "sure"].iter().any(|w| lower.contains(w)) {
        return Tone::Skeptical;
    }
    if ["serious", "critical", "important"].iter().any(|w| lower.contains(w)) {
        return Tone::Serious;
    }
    Tone::Calm
}

/// Parses one chapter's tone-annotated body into a `ToneScript`, trying
/// each tier in order and stopping at the first with any spans.
pub fn parse_chapter_tone_script(chapter_number: u32, body: &str) -> ToneScript {
    let spans = {
        let strict = try_strict(body);
        if !strict.is_empty() {
            strict
        } else {
            let legacy = try_legacy(body);
            if !legacy.is_empty() {
                legacy
            } else {
                try_inferred(body)
            }
        }
    };

    let mut utterances: Vec<Utterance> = Vec::new();
    let mut next_index = 0u32;
    for span in &spans {
        let (mut new_utterances, next) = utterances_from_line(
            chapter_number,
            span.speaker,
            span.tone,
            &span.original_tag,
            &span.text,
            next_index,
        );
        next_index = next;
        utterances.append(&mut new_utterances);
    }

    ToneScript {
        chapter_number,
        markdown: body.to_string(),
        utterances,
    }
}

fn chapter_heading_regex() -> Regex {
    Regex::new(r"(?im)^#{1,4}\s*chapter\s*(\d+)\b.*$").unwrap()
}

/// Splits the Tone Annotator's full response (concatenated under
/// `## Chapter N` headings, spec §4.6 step 1) back into per-chapter bodies,
/// then parses each with the three-tier strategy above.
pub fn parse_tone_document(markdown: &str) -> Vec<ToneScript> {
    let heading_re = chapter_heading_regex();
    let matches: Vec<_> = heading_re.captures_iter(markdown).collect();
    if matches.is_empty() {
        // No chapter headings at all: treat the whole document as chapter 1
        // rather than silently dropping every utterance in it.
        return vec![parse_chapter_tone_script(1, markdown)];
    }

    let mut chapters = Vec::with_capacity(matches.len());
    for (i, cap) in matches.iter().enumerate() {
        let number: u32 = cap[1].parse().unwrap_or((i + 1) as u32);
        let whole = cap.get(0).unwrap();
        let start = whole.end();
        let end = matches
            .get(i + 1)
            .map(|next| next.get(0).unwrap().start())
            .unwrap_or(markdown.len());
        chapters.push(parse_chapter_tone_script(number, &markdown[start..end]));
    }
    chapters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_tier_parses_tone_tags_and_splits_sentences() {
        let body = "**Host 1:** [upbeat] Hello there. How are you?\n\
                     **Host 2:** [calm] I'm well, thanks.";
        let script = parse_chapter_tone_script(1, body);
        assert_eq!(script.utterances.len(), 3);
        assert_eq!(script.utterances[0].speaker, Speaker::Host1);
        assert_eq!(script.utterances[0].tone, Tone::Upbeat);
        assert_eq!(script.utterances[2].speaker, Speaker::Host2);
    }

    #[test]
    fn legacy_tier_alternates_speakers() {
        let body = "**excited** This is amazing news for cyclists.\n\
                     **calm** Indeed, it changes everything.";
        let script = parse_chapter_tone_script(1, body);
        assert_eq!(script.utterances[0].speaker, Speaker::Host1);
        assert_eq!(script.utterances[0].tone, Tone::Excited);
        assert_eq!(script.utterances[1].speaker, Speaker::Host2);
        assert_eq!(script.utterances[1].tone, Tone::Calm);
    }

    #[test]
    fn inferred_tier_used_when_no_tone_tags_present() {
        let body = "**Host 1:** This is incredible, I can't believe it!\n\
                     **Host 2:** But wait, how does that even work?";
        let script = parse_chapter_tone_script(1, body);
        assert_eq!(script.utterances[0].tone, Tone::Excited);
        assert_eq!(script.utterances[1].tone, Tone::Curious);
    }

    #[test]
    fn strict_tier_infers_tone_instead_of_dropping_an_unrecognized_tag() {
        let body = "**Host 1:** [calm] First line is fine.\n\
                     **Host 2:** [zany] This is incredible, unbelievable stuff!";
        let script = parse_chapter_tone_script(1, body);
        assert_eq!(script.utterances.len(), 2);
        assert_eq!(script.utterances[1].speaker, Speaker::Host2);
        assert_eq!(script.utterances[1].tone, Tone::Excited);
        assert_eq!(script.utterances[1].original_tag, "zany");
    }

    #[test]
    fn legacy_synonyms_preserve_original_tag() {
        let body = "**Host 1:** [hopeful] Things are looking up.";
        let script = parse_chapter_tone_script(1, body);
        assert_eq!(script.utterances[0].tone, Tone::Upbeat);
        assert_eq!(script.utterances[0].original_tag, "hopeful");
    }

    #[test]
    fn splits_multi_chapter_document_by_heading() {
        let doc = "## Chapter 1\n**Host 1:** [calm] First chapter line.\n\n\
                    ## Chapter 2\n**Host 2:** [excited] Second chapter line!";
        let scripts = parse_tone_document(doc);
        assert_eq!(scripts.len(), 2);
        assert_eq!(scripts[0].chapter_number, 1);
        assert_eq!(scripts[1].chapter_number, 2);
        assert_eq!(scripts[1].utterances[0].speaker, Speaker::Host2);
    }
}
