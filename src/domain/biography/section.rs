//! Life sections - the six structured chapters of a biography.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six life sections, in fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeSectionKind {
    Childhood,
    Education,
    Career,
    Family,
    Challenges,
    Dreams,
}

impl LifeSectionKind {
    /// Returns all sections in canonical display order.
    pub fn all() -> &'static [LifeSectionKind] {
        &[
            LifeSectionKind::Childhood,
            LifeSectionKind::Education,
            LifeSectionKind::Career,
            LifeSectionKind::Family,
            LifeSectionKind::Challenges,
            LifeSectionKind::Dreams,
        ]
    }

    /// Returns the JSON key under which the section is stored.
    pub fn key(&self) -> &'static str {
        match self {
            LifeSectionKind::Childhood => "childhood",
            LifeSectionKind::Education => "education",
            LifeSectionKind::Career => "career",
            LifeSectionKind::Family => "family",
            LifeSectionKind::Challenges => "challenges",
            LifeSectionKind::Dreams => "dreams",
        }
    }

    /// Returns the key used by older stored records.
    pub fn legacy_key(&self) -> &'static str {
        match self {
            LifeSectionKind::Childhood => "childhoodMemories",
            LifeSectionKind::Education => "educationJourney",
            LifeSectionKind::Career => "careerAchievements",
            LifeSectionKind::Family => "familyRelationships",
            LifeSectionKind::Challenges => "challengesLessons",
            LifeSectionKind::Dreams => "dreamsBeliefs",
        }
    }

    /// Returns the human-readable heading used in documents.
    pub fn display_label(&self) -> &'static str {
        match self {
            LifeSectionKind::Childhood => "Childhood Memories",
            LifeSectionKind::Education => "Education Journey",
            LifeSectionKind::Career => "Career & Achievements",
            LifeSectionKind::Family => "Family & Relationships",
            LifeSectionKind::Challenges => "Life Challenges & Lessons",
            LifeSectionKind::Dreams => "Dreams, Beliefs & Future Goals",
        }
    }

    /// Returns the label used when restating the section in a prompt.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            LifeSectionKind::Childhood => "Childhood memories",
            LifeSectionKind::Education => "Education journey",
            LifeSectionKind::Career => "Career & achievements",
            LifeSectionKind::Family => "Family & relationships",
            LifeSectionKind::Challenges => "Life challenges & lessons",
            LifeSectionKind::Dreams => "Dreams, beliefs & future goals",
        }
    }

    /// Returns the short description shown next to the section editor.
    pub fn description(&self) -> &'static str {
        match self {
            LifeSectionKind::Childhood => "Capture the earliest chapters of your life.",
            LifeSectionKind::Education => "Document how learning shaped you.",
            LifeSectionKind::Career => "Highlight milestones from your work life.",
            LifeSectionKind::Family => "Celebrate meaningful connections.",
            LifeSectionKind::Challenges => "Share how you grew through adversity.",
            LifeSectionKind::Dreams => "Look ahead to what comes next.",
        }
    }

    /// Returns the guiding questions offered while writing the section.
    pub fn guiding_prompts(&self) -> [&'static str; 3] {
        match self {
            LifeSectionKind::Childhood => [
                "What are your earliest memories of home?",
                "Who influenced you most during your childhood?",
                "Describe a moment from childhood that shaped your values.",
            ],
            LifeSectionKind::Education => [
                "Which teachers or mentors inspired you?",
                "How did your education impact your life path?",
                "Share a transformative learning experience.",
            ],
            LifeSectionKind::Career => [
                "What motivated your career choices?",
                "Describe a breakthrough moment at work.",
                "Which achievements are you most proud of?",
            ],
            LifeSectionKind::Family => [
                "Who are the key figures in your family story?",
                "How have relationships evolved over time?",
                "What family traditions mean the most to you?",
            ],
            LifeSectionKind::Challenges => [
                "Describe a major challenge and what you learned.",
                "How did adversity change your perspective?",
                "What advice would you give your younger self?",
            ],
            LifeSectionKind::Dreams => [
                "What beliefs guide your decisions?",
                "How do you imagine the future?",
                "What legacy do you want to leave?",
            ],
        }
    }
}

impl fmt::Display for LifeSectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One life section's content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeSection {
    pub summary: String,
}

impl LifeSection {
    /// Creates a section with the given summary.
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }

    /// Returns true when the summary has no visible content.
    pub fn is_blank(&self) -> bool {
        self.summary.trim().is_empty()
    }
}
