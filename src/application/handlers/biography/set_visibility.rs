//! SetVisibilityHandler - Command handler publishing or hiding a biography.

use serde_json::Value;
use std::sync::Arc;

use crate::domain::biography::BiographyAggregate;
use crate::domain::foundation::{CommandMetadata, DomainError, ValidationError};
use crate::ports::BiographyRepository;

/// Command carrying `{ "isPublic": <bool> }`.
#[derive(Debug, Clone)]
pub struct SetVisibilityCommand {
    pub payload: Value,
}

/// Handler toggling public visibility. The share token is minted on the
/// first publish and survives later unpublish/publish cycles.
pub struct SetVisibilityHandler {
    repository: Arc<dyn BiographyRepository>,
}

impl SetVisibilityHandler {
    pub fn new(repository: Arc<dyn BiographyRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: SetVisibilityCommand,
        metadata: CommandMetadata,
    ) -> Result<BiographyAggregate, DomainError> {
        let is_public = cmd
            .payload
            .get("isPublic")
            .and_then(Value::as_bool)
            .ok_or_else(|| ValidationError::invalid_format("isPublic", "expected a boolean"))?;

        let biography = self
            .repository
            .update(
                &metadata.user_id,
                Box::new(move |biography: &mut BiographyAggregate| {
                    biography.set_visibility(is_public);
                    Ok(())
                }),
            )
            .await?;

        tracing::info!(
            user_id = %metadata.user_id,
            is_public,
            public_id = biography.public_id().map(|id| id.as_str()),
            "Visibility changed"
        );
        Ok(biography)
    }
}
