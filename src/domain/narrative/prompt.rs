//! Prompt builder for the story generator.

use std::fmt::Write;

use crate::domain::biography::{BiographyAggregate, Voice};

/// Substituted for blank name, birthdate and birthplace.
const UNKNOWN: &str = "Unknown";
const NO_BACKGROUND: &str = "No background provided";
const NO_SECTION_CONTENT: &str = "No content";
const NO_EVENTS: &str = "No events provided";

/// Builds the generation request text for `aggregate` in the given voice.
///
/// The text restates every personal detail, section summary and timeline
/// event, and describes the markup the tokenizer understands so the reply
/// can be rendered directly.
pub fn build_prompt(aggregate: &BiographyAggregate, voice: Voice) -> String {
    let info = aggregate.personal_information();
    let mut prompt = String::new();

    prompt.push_str(
        "You are an award-winning memoir writer. Using the data provided, craft a compelling \
         autobiography chapter outline and narrative.\n\n",
    );

    // Writing to a String cannot fail.
    let _ = writeln!(
        prompt,
        "Desired voice: {} - {}\n",
        voice.as_str().to_uppercase(),
        voice.style_guidance()
    );

    prompt.push_str(
        "Structure the response using:\n\
         1. Title\n\
         2. Subtitle or opening quote\n\
         3. Chronological sections with headings (Childhood, Education, Career, Family, Challenges, Dreams)\n\
         4. Each section should include paragraphs weaving facts with reflections.\n\
         5. Conclude with a resonant closing paragraph about future aspirations.\n\n",
    );

    prompt.push_str("Personal details:\n");
    let _ = writeln!(prompt, "- Name: {}", or_default(&info.name, UNKNOWN));
    let _ = writeln!(prompt, "- Birthdate: {}", or_default(&info.date_of_birth, UNKNOWN));
    let _ = writeln!(prompt, "- Birthplace: {}", or_default(&info.birthplace, UNKNOWN));
    let _ = writeln!(
        prompt,
        "- Background: {}\n",
        or_default(&info.background, NO_BACKGROUND)
    );

    for (kind, section) in aggregate.sections() {
        let _ = writeln!(
            prompt,
            "{}: {}",
            kind.prompt_label(),
            or_default(&section.summary, NO_SECTION_CONTENT)
        );
    }

    prompt.push_str("\nTimeline events:\n");
    if aggregate.timeline().is_empty() {
        prompt.push_str(NO_EVENTS);
        prompt.push('\n');
    } else {
        for (index, event) in aggregate.timeline().iter().enumerate() {
            let _ = write!(
                prompt,
                "{}. {} ({}) - {}",
                index + 1,
                event.title,
                event.date,
                event.description
            );
            if let Some(notes) = event.visible_notes() {
                let _ = write!(prompt, " Notes: {}", notes);
            }
            prompt.push('\n');
        }
    }

    prompt.push_str(
        "\nBlend the timeline into the narrative where natural. Avoid repeating raw bullet lists.\n\n\
         Format the response as plain text with these line markers only:\n\
         - \"# \" at the start of the title line\n\
         - \"## \" at the start of the subtitle line\n\
         - \"### \" at the start of each section heading\n\
         - \"> \" at the start of a quotation line\n\
         - an empty line between paragraphs\n\
         Do not use any other formatting such as bold, italics, lists or tables.",
    );

    prompt
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}
