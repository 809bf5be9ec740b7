//! GetPublicBiographyHandler - Query handler behind the public share link.
//!
//! Unknown tokens, malformed tokens and unpublished biographies all yield
//! the same not-found error.

use std::sync::Arc;

use crate::domain::biography::{project, PublicBiographyView};
use crate::domain::foundation::{DomainError, PublicId};
use crate::ports::BiographyRepository;

/// Query by share token.
#[derive(Debug, Clone)]
pub struct GetPublicBiographyQuery {
    pub public_id: String,
}

/// Handler returning the public projection of a shared biography.
pub struct GetPublicBiographyHandler {
    repository: Arc<dyn BiographyRepository>,
}

impl GetPublicBiographyHandler {
    pub fn new(repository: Arc<dyn BiographyRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetPublicBiographyQuery,
    ) -> Result<PublicBiographyView, DomainError> {
        let not_found = || DomainError::not_found("Biography not found");

        let public_id = PublicId::new(query.public_id).map_err(|_| not_found())?;
        let biography = self
            .repository
            .find_by_public_id(&public_id)
            .await?
            .ok_or_else(not_found)?;

        project(&biography)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryBiographyRepository;
    use crate::domain::foundation::{ErrorCode, UserId};

    async fn published(repo: &InMemoryBiographyRepository, user: &str, public: bool) -> String {
        let mut bio = repo.find_or_create(&UserId::new(user).unwrap()).await.unwrap();
        bio.set_visibility(true);
        if !public {
            bio.set_visibility(false);
        }
        repo.save(&bio).await.unwrap();
        bio.public_id().unwrap().as_str().to_string()
    }

    #[tokio::test]
    async fn returns_projection_for_public_biography() {
        let repo = Arc::new(InMemoryBiographyRepository::new());
        let token = published(&repo, "author", true).await;
        let handler = GetPublicBiographyHandler::new(repo);

        let view = handler
            .handle(GetPublicBiographyQuery { public_id: token.clone() })
            .await
            .unwrap();

        assert_eq!(view.public_id.as_str(), token);
        assert!(view.narrative.starts_with("# Autobiography"));
    }

    #[tokio::test]
    async fn hidden_unknown_and_blank_tokens_are_not_found() {
        let repo = Arc::new(InMemoryBiographyRepository::new());
        let hidden = published(&repo, "shy", false).await;
        let handler = GetPublicBiographyHandler::new(repo);

        for token in [hidden, "does-not-exist".to_string(), "  ".to_string()] {
            let err = handler
                .handle(GetPublicBiographyQuery { public_id: token })
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::NotFound);
            assert_eq!(err.message, "Biography not found");
        }
    }
}
