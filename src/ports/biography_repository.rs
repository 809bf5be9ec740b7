//! Biography Repository Port - storage collaborator for the aggregate.
//!
//! Repositories persist the aggregate's JSON record and hand back
//! normalized aggregates. Reads always pass through
//! [`BiographyNormalizer`](crate::domain::biography::BiographyNormalizer),
//! so callers never observe a partial record.

use async_trait::async_trait;

use crate::domain::biography::BiographyAggregate;
use crate::domain::foundation::{DomainError, PublicId, UserId};

/// Change applied to a biography inside the repository's critical section.
///
/// Returning an error aborts the update and nothing is written.
pub type BiographyMutation =
    Box<dyn FnOnce(&mut BiographyAggregate) -> Result<(), DomainError> + Send>;

/// Port for biography persistence.
///
/// # Contract
///
/// Implementations must:
/// - Keep at most one record per user
/// - Make `find_or_create` atomic: concurrent first accesses for the same
///   user observe the same aggregate, and a losing racer returns the
///   existing record instead of writing a second one
/// - Make `update` a single read-modify-write, so a mutation always sees
///   the latest record and concurrent updates never overwrite each other
/// - Normalize every record on read
/// - Resolve `find_by_public_id` over every stored record
#[async_trait]
pub trait BiographyRepository: Send + Sync {
    /// Returns the user's biography, creating a defaulted one if absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store fails.
    async fn find_or_create(&self, user_id: &UserId) -> Result<BiographyAggregate, DomainError>;

    /// Returns the user's biography without creating one.
    async fn find_by_user(&self, user_id: &UserId)
        -> Result<Option<BiographyAggregate>, DomainError>;

    /// Finds the biography carrying the given share token.
    ///
    /// Returns the aggregate regardless of its current visibility; the
    /// caller decides whether it may be shown.
    async fn find_by_public_id(
        &self,
        public_id: &PublicId,
    ) -> Result<Option<BiographyAggregate>, DomainError>;

    /// Applies `mutation` to the user's current biography (created if absent)
    /// and stores the result.
    ///
    /// # Errors
    ///
    /// Returns the mutation's error unchanged, or `StorageError`.
    async fn update(
        &self,
        user_id: &UserId,
        mutation: BiographyMutation,
    ) -> Result<BiographyAggregate, DomainError>;

    /// Persists the aggregate, replacing any previous record for its user.
    async fn save(&self, biography: &BiographyAggregate) -> Result<(), DomainError>;
}
