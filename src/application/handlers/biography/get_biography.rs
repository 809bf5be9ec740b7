//! GetBiographyHandler - Query handler for a user's own biography.

use std::sync::Arc;

use crate::domain::biography::BiographyAggregate;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::BiographyRepository;

/// Query for the caller's biography.
#[derive(Debug, Clone)]
pub struct GetBiographyQuery {
    pub user_id: UserId,
}

/// Handler returning the normalized biography, creating it on first access.
pub struct GetBiographyHandler {
    repository: Arc<dyn BiographyRepository>,
}

impl GetBiographyHandler {
    pub fn new(repository: Arc<dyn BiographyRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetBiographyQuery) -> Result<BiographyAggregate, DomainError> {
        self.repository.find_or_create(&query.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryBiographyRepository;
    use crate::domain::biography::LifeSectionKind;
    use serde_json::json;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn creates_default_biography_on_first_access() {
        let repo = Arc::new(InMemoryBiographyRepository::new());
        let handler = GetBiographyHandler::new(repo.clone());

        let bio = handler
            .handle(GetBiographyQuery { user_id: user("new") })
            .await
            .unwrap();

        assert_eq!(bio.user_id(), &user("new"));
        assert!(bio.timeline().is_empty());
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn returns_normalized_legacy_record() {
        let repo = Arc::new(InMemoryBiographyRepository::new());
        repo.seed_raw(
            user("old"),
            json!({ "educationJourney": { "summary": "Night school" }, "timeline": [{ "title": "Born" }] }),
        )
        .await;
        let handler = GetBiographyHandler::new(repo);

        let bio = handler
            .handle(GetBiographyQuery { user_id: user("old") })
            .await
            .unwrap();

        assert_eq!(bio.section(LifeSectionKind::Education).summary, "Night school");
        assert_eq!(bio.timeline()[0].id.as_str(), "event-1");
    }
}
