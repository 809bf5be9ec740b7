//! Command metadata shared by every write handler.
//!
//! Handlers take the acting user and request correlation from one
//! `CommandMetadata` value instead of separate parameters, so log lines and
//! generation requests carry the same identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Context that flows through command processing.
///
/// # Example
///
/// ```ignore
/// let metadata = CommandMetadata::new(user_id).with_source("cli");
/// handler.handle(SetVisibilityCommand { payload }, metadata).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user whose biography the command acts on.
    pub user_id: UserId,

    /// Links log lines and upstream calls belonging to one request.
    /// Generated on creation unless supplied.
    correlation_id: String,

    /// Where the command came from (e.g. "cli", "test").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates metadata for `user_id` with a fresh correlation id.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: Uuid::new_v4().to_string(),
            source: None,
        }
    }

    /// Builder: use a caller-supplied correlation id.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    /// Builder: record the command source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Metadata for a fixed test user.
    pub fn test_fixture() -> Self {
        Self::new(UserId::new("test-user-123").unwrap())
            .with_correlation_id("test-correlation-id")
            .with_source("test")
    }
}
