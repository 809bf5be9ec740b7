//! In-Memory Biography Repository
//!
//! Keeps raw JSON records in memory, keyed by user. Useful for tests,
//! development and single-process runs.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::biography::{BiographyAggregate, BiographyNormalizer};
use crate::domain::foundation::{DomainError, PublicId, UserId};
use crate::ports::{BiographyMutation, BiographyRepository};

/// In-memory storage for biographies.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBiographyRepository {
    records: Arc<RwLock<HashMap<UserId, Value>>>,
}

impl InMemoryBiographyRepository {
    /// Create a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw record as-is, bypassing normalization (useful for tests
    /// that need partial or legacy records).
    pub async fn seed_raw(&self, user_id: UserId, record: Value) {
        self.records.write().await.insert(user_id, record);
    }

    /// Returns the raw stored record for a user.
    pub async fn raw_record(&self, user_id: &UserId) -> Option<Value> {
        self.records.read().await.get(user_id).cloned()
    }

    /// Get the number of stored biographies.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

fn to_record(biography: &BiographyAggregate) -> Result<Value, DomainError> {
    biography
        .to_record()
        .map_err(|e| DomainError::storage(format!("Failed to serialize biography: {}", e)))
}

#[async_trait]
impl BiographyRepository for InMemoryBiographyRepository {
    async fn find_or_create(&self, user_id: &UserId) -> Result<BiographyAggregate, DomainError> {
        // The write lock makes check-then-insert a single step.
        let mut records = self.records.write().await;

        match records.get(user_id) {
            Some(raw) => {
                let biography = BiographyNormalizer::normalize(user_id, raw);
                let healed = to_record(&biography)?;
                if &healed != raw {
                    records.insert(user_id.clone(), healed);
                }
                Ok(biography)
            }
            None => {
                let biography = BiographyAggregate::new(user_id.clone());
                records.insert(user_id.clone(), to_record(&biography)?);
                tracing::debug!(user_id = %user_id, "Created biography");
                Ok(biography)
            }
        }
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<BiographyAggregate>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .get(user_id)
            .map(|raw| BiographyNormalizer::normalize(user_id, raw)))
    }

    async fn find_by_public_id(
        &self,
        public_id: &PublicId,
    ) -> Result<Option<BiographyAggregate>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .map(|(user_id, raw)| BiographyNormalizer::normalize(user_id, raw))
            .find(|biography| biography.public_id() == Some(public_id)))
    }

    async fn update(
        &self,
        user_id: &UserId,
        mutation: BiographyMutation,
    ) -> Result<BiographyAggregate, DomainError> {
        let mut records = self.records.write().await;

        let mut biography = match records.get(user_id) {
            Some(raw) => BiographyNormalizer::normalize(user_id, raw),
            None => BiographyAggregate::new(user_id.clone()),
        };
        mutation(&mut biography)?;
        records.insert(user_id.clone(), to_record(&biography)?);
        Ok(biography)
    }

    async fn save(&self, biography: &BiographyAggregate) -> Result<(), DomainError> {
        let record = to_record(biography)?;
        self.records
            .write()
            .await
            .insert(biography.user_id().clone(), record);
        Ok(())
    }
}
