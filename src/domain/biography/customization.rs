//! Presentation settings for the finished book.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Closed set of typefaces offered for the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    #[serde(rename = "Inter")]
    Inter,
    #[serde(rename = "Playfair Display")]
    PlayfairDisplay,
    #[serde(rename = "Merriweather")]
    Merriweather,
    #[serde(rename = "Roboto Serif")]
    RobotoSerif,
}

impl FontFamily {
    /// Returns all fonts; the first is the default.
    pub fn all() -> &'static [FontFamily] {
        &[
            FontFamily::Inter,
            FontFamily::PlayfairDisplay,
            FontFamily::Merriweather,
            FontFamily::RobotoSerif,
        ]
    }

    /// Returns the font identifier as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            FontFamily::Inter => "Inter",
            FontFamily::PlayfairDisplay => "Playfair Display",
            FontFamily::Merriweather => "Merriweather",
            FontFamily::RobotoSerif => "Roboto Serif",
        }
    }

    /// Returns the label shown in font pickers.
    pub fn label(&self) -> &'static str {
        match self {
            FontFamily::Inter => "Inter (Modern)",
            FontFamily::PlayfairDisplay => "Playfair Display (Classic)",
            FontFamily::Merriweather => "Merriweather (Editorial)",
            FontFamily::RobotoSerif => "Roboto Serif (Clean Serif)",
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FontFamily {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontFamily::all()
            .iter()
            .copied()
            .find(|font| font.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::unsupported_value("customization.font", s))
    }
}

/// Book title page and styling choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub font: FontFamily,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_quote: Option<String>,
}
