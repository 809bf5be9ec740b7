//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which provider generates stories
    #[serde(default)]
    pub provider: AiProvider,

    /// Google Gemini API key
    pub gemini_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Model identifier; each provider has its own default
    pub model: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Upper bound on generated tokens
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Gemini,
    Anthropic,
    /// Canned offline responses
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Gemini is configured
    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Returns the API key the selected provider needs.
    ///
    /// The mock provider needs none and yields `Ok(None)`.
    pub fn api_key(&self) -> Result<Option<&str>, ValidationError> {
        match self.provider {
            AiProvider::Gemini if self.has_gemini() => Ok(self.gemini_api_key.as_deref()),
            AiProvider::Gemini => Err(ValidationError::MissingRequired("GEMINI_API_KEY")),
            AiProvider::Anthropic if self.has_anthropic() => Ok(self.anthropic_api_key.as_deref()),
            AiProvider::Anthropic => Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY")),
            AiProvider::Mock => Ok(None),
        }
    }

    /// Validate AI configuration
    ///
    /// API keys are checked separately by [`AiConfig::api_key`], so commands
    /// that never generate can run without credentials.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_output_tokens == 0 {
            return Err(ValidationError::InvalidMaxOutputTokens);
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ValidationError::InvalidTemperature);
            }
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            gemini_api_key: None,
            anthropic_api_key: None,
            model: None,
            timeout_secs: default_timeout(),
            max_output_tokens: default_max_output_tokens(),
            temperature: None,
        }
    }
}

fn default_timeout() -> u64 {
    120
}

fn default_max_output_tokens() -> u32 {
    4096
}
