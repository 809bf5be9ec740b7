//! Voice enum - the narrative tone requested from the story generator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Narrative voice for generated stories.
///
/// Governs prompt construction only; rendering ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Emotional,
    Professional,
    Simple,
    Poetic,
}

impl Voice {
    /// Returns all voices in display order.
    pub fn all() -> &'static [Voice] {
        &[
            Voice::Emotional,
            Voice::Professional,
            Voice::Simple,
            Voice::Poetic,
        ]
    }

    /// Returns the wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Emotional => "emotional",
            Voice::Professional => "professional",
            Voice::Simple => "simple",
            Voice::Poetic => "poetic",
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Voice::Emotional => "Emotional",
            Voice::Professional => "Professional",
            Voice::Simple => "Simple",
            Voice::Poetic => "Poetic",
        }
    }

    /// Returns a one-line description for voice pickers.
    pub fn description(&self) -> &'static str {
        match self {
            Voice::Emotional => "Rich, heartfelt storytelling.",
            Voice::Professional => "Clear, structured narrative.",
            Voice::Simple => "Accessible, straightforward voice.",
            Voice::Poetic => "Lyrical with imagery and rhythm.",
        }
    }

    /// Returns the instruction sentence handed to the generator.
    pub fn style_guidance(&self) -> &'static str {
        match self {
            Voice::Emotional => {
                "Write with emotional depth and warmth. Emphasize sensory detail and internal reflections."
            }
            Voice::Professional => {
                "Write with clear structure, polished language, and a confident, inspiring tone suited for professional audiences."
            }
            Voice::Simple => {
                "Write in friendly, easy-to-read language. Use short sentences and conversational tone."
            }
            Voice::Poetic => {
                "Write lyrically with rich imagery, metaphors, and rhythm while keeping the narrative coherent."
            }
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Voice {
    type Err = ValidationError;

    /// Parses a voice identifier. Unknown values are rejected, never coerced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Voice::all()
            .iter()
            .copied()
            .find(|voice| voice.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| ValidationError::unsupported_value("voice", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_voices_case_insensitively() {
        assert_eq!("poetic".parse::<Voice>().unwrap(), Voice::Poetic);
        assert_eq!("SIMPLE".parse::<Voice>().unwrap(), Voice::Simple);
        assert_eq!(" professional ".parse::<Voice>().unwrap(), Voice::Professional);
    }

    #[test]
    fn rejects_unknown_voice() {
        let err = "sarcastic".parse::<Voice>().unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedValue { .. }));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Voice::Emotional).unwrap(), "\"emotional\"");
        assert!(serde_json::from_str::<Voice>("\"angry\"").is_err());
    }

    #[test]
    fn every_voice_has_distinct_guidance() {
        let mut seen = std::collections::HashSet::new();
        for voice in Voice::all() {
            assert!(seen.insert(voice.style_guidance()));
            assert!(!voice.description().is_empty());
        }
    }

    #[test]
    fn default_is_emotional() {
        assert_eq!(Voice::default(), Voice::Emotional);
    }
}
