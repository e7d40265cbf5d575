//! Session repository trait (port)

use async_trait::async_trait;
use sportmeet_shared::EntityId;

use crate::domain::{NewSession, Session};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: NewSession) -> Result<Session, DomainError>;

    /// Exact match on both fields; a matching id with another token is `None`.
    async fn find(&self, session_id: EntityId, token: &str) -> Result<Option<Session>, DomainError>;

    async fn delete(&self, session_id: EntityId) -> Result<(), DomainError>;

    /// Insert `replacement` and delete `old_session_id` in one transaction.
    /// A missing old row is `DomainError::SessionNotFound` and nothing is kept.
    async fn rotate(&self, old_session_id: EntityId, replacement: NewSession) -> Result<Session, DomainError>;
}
