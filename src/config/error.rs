//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Max output tokens must be greater than zero")]
    InvalidMaxOutputTokens,

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Data directory must not be empty")]
    EmptyDataDir,

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}
