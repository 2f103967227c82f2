//! Closed enumeration sets advertised to API callers (spec §3, §6
//! `allowed{Moods|Styles|Tones}`). These mirror the closed sets already
//! enforced by the `Mood`/`Style`/`Tone` enums in `podforge-core`; they
//! exist here only so `validate()` responses can list the legal values
//! without hand-maintaining a second copy of the enum in string form.

pub fn allowed_moods() -> Vec<&'static str> {
    vec!["neutral", "excited", "calm", "reflective", "enthusiastic"]
}

pub fn allowed_styles() -> Vec<&'static str> {
    vec![
        "storytelling",
        "conversational",
        "interview",
        "educational",
        "narrative",
    ]
}

pub fn allowed_tones() -> Vec<&'static str> {
    vec![
        "upbeat",
        "calm",
        "excited",
        "reflective",
        "suspenseful",
        "skeptical",
        "humorous",
        "serious",
        "curious",
        "confident",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_sets_are_non_empty_and_closed() {
        assert_eq!(allowed_moods().len(), 5);
        assert_eq!(allowed_styles().len(), 5);
        assert_eq!(allowed_tones().len(), 10);
    }
}
