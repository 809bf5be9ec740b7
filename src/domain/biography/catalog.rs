//! Editor catalog: the fixed choices a biography offers.

use serde::Serialize;

use super::{FontFamily, LifeSectionKind, Voice};

/// Section, voice and font choices with their display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub sections: Vec<SectionEntry>,
    pub voices: Vec<VoiceEntry>,
    pub fonts: Vec<FontEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub guiding_prompts: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontEntry {
    pub id: &'static str,
    pub label: &'static str,
}

/// Builds the catalog in display order; the first voice and font are the defaults.
pub fn catalog() -> Catalog {
    Catalog {
        sections: LifeSectionKind::all()
            .iter()
            .map(|kind| SectionEntry {
                key: kind.key(),
                label: kind.display_label(),
                description: kind.description(),
                guiding_prompts: kind.guiding_prompts().to_vec(),
            })
            .collect(),
        voices: Voice::all()
            .iter()
            .map(|voice| VoiceEntry {
                id: voice.as_str(),
                label: voice.label(),
                description: voice.description(),
            })
            .collect(),
        fonts: FontFamily::all()
            .iter()
            .map(|font| FontEntry {
                id: font.as_str(),
                label: font.label(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_choice_in_display_order() {
        let catalog = catalog();

        let keys: Vec<_> = catalog.sections.iter().map(|s| s.key).collect();
        assert_eq!(
            keys,
            ["childhood", "education", "career", "family", "challenges", "dreams"]
        );
        assert!(catalog.sections.iter().all(|s| s.guiding_prompts.len() == 3));
        assert_eq!(catalog.voices.len(), 4);
        assert_eq!(catalog.voices[0].id, Voice::default().as_str());
        assert_eq!(catalog.fonts[0].id, FontFamily::default().as_str());
    }

    #[test]
    fn serializes_display_text() {
        let value = serde_json::to_value(catalog()).unwrap();

        assert_eq!(value["sections"][2]["label"], "Career & Achievements");
        assert_eq!(
            value["sections"][2]["description"],
            "Highlight milestones from your work life."
        );
        assert_eq!(
            value["sections"][0]["guidingPrompts"][0],
            "What are your earliest memories of home?"
        );
        assert_eq!(value["voices"][3]["id"], "poetic");
        assert_eq!(value["voices"][3]["label"], "Poetic");
        assert_eq!(value["voices"][3]["description"], "Lyrical with imagery and rhythm.");
        assert_eq!(value["fonts"][1]["id"], "Playfair Display");
        assert_eq!(value["fonts"][1]["label"], "Playfair Display (Classic)");
    }
}
