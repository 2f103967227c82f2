//! Parses the Planner's (C2) markdown output into a `Plan` record (spec §3,
//! §4.2). Tolerant of heading level and minor formatting drift, but expects
//! the `### Chapter N: <title>` + four-bullet shape the Planner's system
//! prompt asks the model for.

use regex::Regex;

use podforge_core::markdown::check_required_sections;
use podforge_core::{Error, Plan, PlanChapter, Result, WordBudget};

/// Heading fragments the lenient validator checks for (spec §4.2: "if ≤2
/// named sections... are missing, log and proceed; if >2 missing, fail").
const REQUIRED_SECTIONS: &[&str] = &[
    "overview",
    "chapter breakdown",
    "research priorities",
    "style guidelines",
];

pub fn parse_plan(markdown: &str, expected_chapters: u32, budget: WordBudget) -> Result<Plan> {
    let check = check_required_sections(markdown, REQUIRED_SECTIONS);
    if check.missing.len() > 2 {
        return Err(Error::agent(
            "planner",
            format!(
                "Plan is missing too many required sections: {:?}",
                check.missing
            ),
        ));
    }
    if !check.is_valid() {
        tracing::warn!(missing = ?check.missing, "plan missing some required sections, proceeding leniently");
    }

    let chapters = parse_chapters(markdown, budget.per_chapter);
    if chapters.len() as u32 != expected_chapters {
        tracing::warn!(
            expected = expected_chapters,
            found = chapters.len(),
            "plan chapter count does not match brief; downstream stages will adapt"
        );
    }

    Ok(Plan {
        markdown: markdown.to_string(),
        chapters,
        word_budget: budget,
    })
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

/// Splits the markdown at every `### Chapter N: Title` (or `##`/`####`
/// variant) heading and pulls the four labeled bullets out of each span.
fn parse_chapters(markdown: &str, default_word_estimate: u32) -> Vec<PlanChapter> {
    let heading_re = chapter_heading_regex();
    let duration_re = field_regex("duration");
    let key_points_re = field_regex("key points");
    let purpose_re = field_regex("narrative purpose");
    let research_re = field_regex("research focus");

    let matches: Vec<_> = heading_re.captures_iter(markdown).collect();
    let mut chapters = Vec::with_capacity(matches.len());

    for (i, cap) in matches.iter().enumerate() {
        let number: u32 = cap[1].parse().unwrap_or((i + 1) as u32);
        let title = cap[2].trim().to_string();
        let whole = cap.get(0).unwrap();
        let start = whole.end();
        let end = matches
            .get(i + 1)
            .map(|next| next.get(0).unwrap().start())
            .unwrap_or(markdown.len());
        let body = &markdown[start..end];

        let word_estimate = duration_re
            .captures(body)
            .and_then(|c| c[1].trim().split_whitespace().next().map(str::to_string))
            .and_then(|s| s.parse::<u32>().ok())
            .map(|minutes| minutes * podforge_core::word_budget::WORDS_PER_MINUTE)
            .unwrap_or(default_word_estimate);

        let key_points = key_points_re
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

        let research_focus = research_re
            .captures(body)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();

        chapters.push(PlanChapter {
            number,
            title: if title.is_empty() {
                format!("Chapter {number}")
            } else {
                title
            },
            word_estimate,
            key_points,
            purpose,
            research_focus,
        });
    }

    chapters
}
