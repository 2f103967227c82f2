//! Lenient markdown-as-IPC section checking, shared by every stage agent
//! that must confirm a model response carries its required headings before
//! accepting it (spec §4.3-§4.7: "validate structurally, not by exact
//! string match").

/// Result of checking a document against a list of required heading
/// fragments. Headings are matched case-insensitively and by substring, so
/// `"## Executive Summary"` satisfies a required fragment of `"executive
/// summary"` regardless of heading level or surrounding punctuation.
#[derive(Debug, Clone, Default)]
pub struct SectionCheck {
    pub missing: Vec<String>,
}

impl SectionCheck {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Checks that every line in `markdown` starting with `#` covers each
/// fragment in `required` at least once, case-insensitively.
pub fn check_required_sections(markdown: &str, required: &[&str]) -> SectionCheck {
    let headings: Vec<String> = markdown
        .lines()
        .filter(|line| line.trim_start().starts_with('#'))
        .map(|line| line.to_ascii_lowercase())
        .collect();

    let missing = required
        .iter()
        .filter(|fragment| {
            let fragment = fragment.to_ascii_lowercase();
            !headings.iter().any(|h| h.contains(&fragment))
        })
        .map(|fragment| fragment.to_string())
        .collect();

    SectionCheck { missing }
}

/// Counts markdown bullet-list items (`-`, `*`, `+` prefixed lines), used
/// to sanity-check that a model actually enumerated points rather than
/// writing a single paragraph under the right heading.
pub fn count_bullets(markdown: &str) -> usize {
    markdown
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("+ ")
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_missing_sections_case_insensitively() {
        let markdown = "## Executive Summary\n\nSome text.\n## Key Facts & Statistics\n\n- one";
        let check = check_required_sections(
            markdown,
            &["executive summary", "key facts", "main themes"],
        );
        assert_eq!(check.missing, vec!["main themes"]);
        assert!(!check.is_valid());
    }

    #[test]
    fn all_present_is_valid() {
        let markdown = "# Executive Summary\n# Key Facts\n# Main Themes";
        let check = check_required_sections(markdown, &["executive summary", "key facts", "main themes"]);
        assert!(check.is_valid());
    }

    #[test]
    fn counts_bullets_across_markers() {
        let markdown = "- one\n* two\n+ three\nNot a bullet";
        assert_eq!(count_bullets(markdown), 3);
    }
}
