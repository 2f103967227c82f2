//! Parses the Outliner's (C4) markdown output into the ordered chapter
//! sections downstream stages consume (spec §3, §4.4). The Episode
//! Overview/Opening Hook/Closing Segment/Pacing Notes sections are kept as
//! part of the full document text (returned alongside) but are not modeled
//! as structured `Outline` entries — only the per-chapter sections are,
//! since those are what the Scripter (C5) consumes one at a time.

use regex::Regex;

use podforge_core::{Outline, OutlineSection};

/// Result of parsing one Outliner response: the untouched document (handed
/// to the Scripter as shared context) plus the per-chapter breakdown.
pub struct ParsedOutline {
    pub full_markdown: String,
    pub chapters: Vec<Outline>,
}

fn chapter_heading_regex() -> Regex {
    Regex::new(r"(?im)^#{2,4}\s*chapter\s*(\d+)\s*[:.]?\s*(.*)$").unwrap()
}

fn field_regex(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?im)^\s*[-*]?\s*\**{}\**\s*:\s*(.*)$",
        regex::escape(label)
    ))
    .unwrap()
}

/// Parses the Outline document, distributing `target_words` evenly across
/// the discovered chapter sections as each section's word estimate (spec
/// §4.4: "Calculates a section-by-section word estimate").
pub fn parse_outline(markdown: &str, target_words: u32) -> ParsedOutline {
    let heading_re = chapter_heading_regex();
    let discussion_re = field_regex("discussion points");
    let purpose_re = field_regex("narrative purpose");

    let matches: Vec<_> = heading_re.captures_iter(markdown).collect();
    let per_chapter = if matches.is_empty() {
        target_words
    } else {
        target_words / matches.len() as u32
    };

    let mut chapters = Vec::with_capacity(matches.len());
    for (i, cap) in matches.iter().enumerate() {
        let number: u32 = cap[1].parse().unwrap_or((i + 1) as u32);
        let title = cap[2].trim().to_string();
        let whole = cap.get(0).unwrap();
        let start = whole.start();
        let body_start = whole.end();
        let body_end = matches
            .get(i + 1)
            .map(|next| next.get(0).unwrap().start())
            .unwrap_or(markdown.len());
        let body = &markdown[body_start..body_end];

        let talking_points: Vec<String> = discussion_re
            .captures(body)
            .map(|c| {
                c[1]
                    .split(';')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let purpose = purpose_re
            .captures(body)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();

        let heading = if title.is_empty() {
            format!("Chapter {number}")
        } else {
            title
        };
        let mut talking_points = talking_points;
        if !purpose.is_empty() {
            talking_points.push(format!("Narrative purpose: {purpose}"));
        }

        chapters.push(Outline {
            chapter_number: number,
            markdown: markdown[start..body_end].to_string(),
            sections: vec![OutlineSection {
                heading,
                talking_points,
                word_estimate: per_chapter,
            }],
        });
    }

    ParsedOutline {
        full_markdown: markdown.to_string(),
        chapters,
    }
}

/// Chapter count tolerance is ±1 (spec §4.4): both too-few and too-many are
/// warnings, never a hard failure.
pub fn chapter_count_within_tolerance(expected: u32, found: usize) -> bool {
    (found as i64 - expected as i64).unsigned_abs() <= 1
}
