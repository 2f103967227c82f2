//! Per-stage system prompts, style-conditioned per spec §4.5 ("the system
//! prompt receives one of {conversational, storytelling, interview,
//! educational} guidance blocks; narrative falls through to storytelling").

use podforge_core::{Brief, Message, Mood, Style};

fn style_guidance(style: Style) -> &'static str {
    match style.prompt_guidance_key() {
        Style::Storytelling => {
            "Write as a narrative arc with rising tension and a satisfying resolution. \
             Favor vivid scene-setting over bullet-point delivery."
        }
        Style::Conversational => {
            "Write as two curious friends chatting, trading the floor naturally, \
             reacting to what the other just said before moving on."
        }
        Style::Interview => {
            "Write as Host 1 interviewing Host 2, who is framed as the expert. \
             Host 1 asks focused follow-up questions; Host 2 gives substantive answers."
        }
        Style::Educational => {
            "Write to teach: introduce a concept, give a concrete example, then a brief recap \
             before moving to the next idea."
        }
        Style::Narrative => unreachable!("prompt_guidance_key never returns Narrative"),
    }
}

fn mood_guidance(mood: Mood) -> &'static str {
    match mood {
        Mood::Neutral => "Keep delivery even and informative.",
        Mood::Excited => "Keep energy high throughout; lean into enthusiasm.",
        Mood::Calm => "Keep delivery measured and unhurried.",
        Mood::Reflective => "Favor thoughtful pauses and considered phrasing.",
        Mood::Enthusiastic => "Let genuine enthusiasm for the topic come through.",
    }
}

/// Builds the Planner's (C2) system prompt (spec §4.2).
pub fn planner_system_prompt(brief: &Brief, target_words: u32) -> String {
    format!(
        "You are the Planner for a two-host podcast generation pipeline.\n\n\
         Produce a Plan in markdown with these exact sections, each as a level-2 \
         heading: ## Overview, ## Target Audience, ## Narrative Structure, \
         ## Chapter Breakdown, ## Research Priorities, ## Style Guidelines, \
         ## Success Metrics.\n\n\
         The Chapter Breakdown section MUST contain exactly {chapters} entries, \
         one level-3 heading per chapter in the form `### Chapter N: <title>`, \
         each followed by four bullet lines in this exact order:\n\
         - Duration: <minutes>\n\
         - Key Points: <point one>; <point two>; <point three>\n\
         - Narrative Purpose: <one sentence>\n\
         - Research Focus: <one sentence>\n\n\
         Chapter word estimates must sum to approximately {target_words} words.\n\n\
         {style}\n{mood}",
        chapters = brief.chapters,
        target_words = target_words,
        style = style_guidance(brief.style),
        mood = mood_guidance(brief.mood),
    )
}

/// Builds the Researcher's (C3) system prompt (spec §4.3), used only when
/// no source document was supplied or fetching it failed.
pub fn researcher_system_prompt(brief: &Brief, plan_markdown: &str) -> String {
    format!(
        "You are the Researcher for a two-host podcast generation pipeline.\n\n\
         Produce ResearchNotes in markdown with at least these sections: \
         Executive Summary, Key Facts & Statistics, Main Themes & Perspectives.\n\n\
         Topic: {topic}\n\n\
         Address each chapter's research focus from this plan:\n{plan}",
        topic = brief.topic,
        plan = plan_markdown,
    )
}

/// Builds the Outliner's (C4) system prompt (spec §4.4).
pub fn outliner_system_prompt(brief: &Brief, target_words: u32) -> String {
    format!(
        "You are the Outliner for a two-host podcast generation pipeline.\n\n\
         Produce an Outline in markdown with these level-2 headings, in order: \
         ## Episode Overview, ## Opening Hook, ## Chapter Outlines, \
         ## Closing Segment, ## Pacing Notes.\n\n\
         Under ## Chapter Outlines, write exactly {chapters} entries, one level-3 \
         heading per chapter in the form `### Chapter N: <title>`, each followed by \
         two bullet lines in this exact order:\n\
         - Discussion Points: <point one>; <point two>; <point three>\n\
         - Narrative Purpose: <one sentence>\n\n\
         Target roughly {target_words} spoken words across the whole episode.\n\n\
         {style}",
        chapters = brief.chapters,
        target_words = target_words,
        style = style_guidance(brief.style),
    )
}

/// Builds the Scripter's (C5) system prompt for one chapter (spec §4.5).
pub fn scripter_system_prompt(brief: &Brief, chapter_number: u32, target_words_for_chapter: u32) -> String {
    format!(
        "You are the Scripter for chapter {chapter_number} of a two-host podcast.\n\n\
         Write dialogue lines of the form `**Host 1:** ...` and `**Host 2:** ...` only, \
         plus a trailing Speaking Notes block. Target {target_words} spoken words \
         for this chapter, within 2% of that target.\n\n\
         {style}\n{mood}",
        chapter_number = chapter_number,
        target_words = target_words_for_chapter,
        style = style_guidance(brief.style),
        mood = mood_guidance(brief.mood),
    )
}

/// Builds the Scripter's corrective directive appended to the prompt after
/// a failed convergence attempt (spec §4.5).
pub fn scripter_correction(words_produced: u32, words_required: u32) -> String {
    if words_produced < words_required {
        format!(
            "Your previous draft had {words_produced} words; the target is {words_required}. \
             Expand the dialogue by roughly {delta} words while keeping the same structure.",
            delta = words_required - words_produced,
        )
    } else {
        format!(
            "Your previous draft had {words_produced} words; the target is {words_required}. \
             Condense the dialogue by roughly {delta} words while keeping the same structure.",
            delta = words_produced - words_required,
        )
    }
}

/// Builds the Tone Annotator's (C6) system prompt (spec §4.6).
pub fn tone_annotator_system_prompt() -> String {
    "You are the Tone Annotator for a two-host podcast script.\n\n\
     For every host line, insert a bracketed tone tag immediately after the speaker \
     label, in the exact form `**Host N:** [tone] text`, choosing tone from: \
     upbeat, calm, excited, reflective, suspenseful, skeptical, humorous, serious, \
     curious, confident. Never place the tag anywhere except directly after the colon. \
     Do not alter the wording of the dialogue."
        .to_string()
}

/// Builds the Editor's (C7) system prompt (spec §4.7).
pub fn editor_system_prompt(target_words: u32, tolerance_pct: f32) -> String {
    format!(
        "You are the Editor for a two-host podcast script.\n\n\
         Adjust the script so its total spoken word count is within {tolerance_pct}% of \
         {target_words} words. Preserve every tone tag and host label exactly. \
         Do not introduce placeholder text."
    )
}

/// Builds the Editor's corrective directive for a revision pass (spec §4.7).
pub fn editor_correction(words_produced: u32, words_required: u32) -> String {
    scripter_correction(words_produced, words_required)
}

pub fn to_messages(system_prompt: String, user_message: String) -> Vec<Message> {
    vec![Message::system(system_prompt), Message::user(user_message)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use podforge_core::Style;

    fn brief() -> Brief {
        Brief {
            topic: "The history of the bicycle".to_string(),
            focus: None,
            mood: Mood::Neutral,
            style: Style::Conversational,
            chapters: 3,
            duration_min: 5,
            source: None,
        }
    }

    #[test]
    fn planner_prompt_mentions_exact_chapter_count() {
        let prompt = planner_system_prompt(&brief(), 750);
        assert!(prompt.contains("exactly 3 entries"));
        assert!(prompt.contains("750"));
    }

    #[test]
    fn narrative_style_resolves_to_storytelling_guidance() {
        let mut b = brief();
        b.style = Style::Narrative;
        let prompt = scripter_system_prompt(&b, 1, 250);
        assert!(prompt.contains("narrative arc"));
    }

    #[test]
    fn scripter_correction_picks_expand_or_condense() {
        assert!(scripter_correction(100, 200).contains("Expand"));
        assert!(scripter_correction(300, 200).contains("Condense"));
    }
}
