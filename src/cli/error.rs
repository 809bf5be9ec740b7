//! Errors surfaced by the command-line front end.

use thiserror::Error;

use crate::config::{ConfigError, ValidationError};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::AIError;

/// Process exit codes.
pub struct ExitCode;

impl ExitCode {
    pub const SUCCESS: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const IO_ERROR: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UPSTREAM_ERROR: i32 = 10;
    pub const USAGE_ERROR: i32 = 64;
}

/// Top-level error for CLI runs.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Provider setup failed: {0}")]
    Provider(#[from] AIError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("--user is required for this command")]
    MissingUser,
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Config(ConfigError::ValidationFailed(err))
    }
}

impl CliError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CliError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Provider(_) => ExitCode::CONFIG_ERROR,
            CliError::Io { .. } => ExitCode::IO_ERROR,
            CliError::Json(_) | CliError::MissingUser => ExitCode::USAGE_ERROR,
            CliError::Domain(err) => match err.code {
                ErrorCode::ValidationFailed => ExitCode::USAGE_ERROR,
                ErrorCode::NotFound => ExitCode::NOT_FOUND,
                ErrorCode::UpstreamGenerationFailed => ExitCode::UPSTREAM_ERROR,
                ErrorCode::ExportFailed | ErrorCode::StorageError | ErrorCode::InternalError => {
                    ExitCode::ERROR
                }
            },
        }
    }
}
