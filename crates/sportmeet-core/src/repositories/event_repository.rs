//! Event repository trait (port)

use async_trait::async_trait;
use sportmeet_shared::EntityId;

use crate::domain::{CreateEvent, Event, UpdateEvent};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Includes creator profile and location.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Event>, DomainError>;

    /// Non-private events, newest first, with creator and location.
    async fn find_public(&self, limit: i64) -> Result<Vec<Event>, DomainError>;

    /// Location, event and member rows in one transaction. Duplicate member
    /// ids collapse; an unknown member id is `UnknownMember`.
    async fn create(&self, creator_id: EntityId, data: CreateEvent) -> Result<Event, DomainError>;

    /// Event fields and location in one transaction.
    async fn update(&self, update: UpdateEvent) -> Result<(), DomainError>;

    /// Members, event and location in one transaction.
    async fn delete_with_dependents(&self, id: EntityId) -> Result<(), DomainError>;
}
