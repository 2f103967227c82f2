//! Abbreviation-aware sentence splitting, adapted from the streaming
//! sentence detector used for TTS chunking: that detector scans an
//! incoming text buffer for a sentence terminator and then looks ahead past
//! trailing closing quotes/brackets before cutting a chunk. Utterances need
//! the same terminator-plus-lookahead rule but over a whole paragraph already
//! held in memory, so this is a one-shot version of the same scan rather
//! than a streaming one.

/// Common abbreviations whose trailing period must not be treated as a
/// sentence terminator.
const ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "vs.", "etc.", "e.g.", "i.e.", "inc.",
    "ltd.", "co.", "st.", "no.", "fig.",
];

/// Splits a paragraph of spoken dialogue text into sentences, honoring
/// `.`, `!`, `?` terminators followed by a lookahead past any closing quote
/// or bracket character, while refusing to split on a period that is part
/// of a known abbreviation or a decimal number.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if c == '.' || c == '!' || c == '?' {
            if c == '.' && is_abbreviation_boundary(&chars, i) {
                i += 1;
                continue;
            }
            if c == '.' && is_decimal_point(&chars, i) {
                i += 1;
                continue;
            }
            let mut end = i + 1;
            // Lookahead past closing quotes/brackets that belong to this sentence.
            while end < chars.len() && matches!(chars[end], '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}')
            {
                end += 1;
            }
            let candidate: String = chars[start..end].iter().collect();
            let trimmed = candidate.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            // Skip whitespace before the next sentence starts.
            while end < chars.len() && chars[end].is_whitespace() {
                end += 1;
            }
            start = end;
            i = end;
            continue;
        }
        i += 1;
    }

    if start < chars.len() {
        let remainder: String = chars[start..].iter().collect();
        let trimmed = remainder.trim();
        if !trimmed.is_empty() {
            sentences.push(trimmed.to_string());
        }
    }

    sentences
}

fn is_abbreviation_boundary(chars: &[char], dot_index: usize) -> bool {
    // Walk backward from the dot to the start of the current word, then
    // compare (lowercased, with the dot) against the known list.
    let mut start = dot_index;
    while start > 0 && (chars[start - 1].is_alphanumeric() || chars[start - 1] == '.') {
        start -= 1;
    }
    let word: String = chars[start..=dot_index].iter().collect::<String>().to_ascii_lowercase();
    ABBREVIATIONS.contains(&word.as_str())
}

fn is_decimal_point(chars: &[char], dot_index: usize) -> bool {
    let prev_digit = dot_index > 0 && chars[dot_index - 1].is_ascii_digit();
    let next_digit = dot_index + 1 < chars.len() && chars[dot_index + 1].is_ascii_digit();
    prev_digit && next_digit
}
