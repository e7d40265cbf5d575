//! User repository trait (port)

use async_trait::async_trait;
use sportmeet_shared::EntityId;

use crate::domain::{NewUser, UpdateUser, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn exists_by_email_or_user_name(&self, email: &str, user_name: &str) -> Result<bool, DomainError>;
    async fn find_many(&self, limit: i64) -> Result<Vec<User>, DomainError>;
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;
    async fn update_password(&self, id: EntityId, password_hash: &str) -> Result<(), DomainError>;

    /// Apply the present fields only. A taken email or userName is
    /// `EmailOrUserNameTaken`.
    async fn update_profile(&self, update: UpdateUser) -> Result<(), DomainError>;

    /// Remove the user with all sessions and push tokens, all or nothing.
    async fn delete_with_dependents(&self, id: EntityId) -> Result<(), DomainError>;

    async fn add_notification_token(&self, user_id: EntityId, token: &str) -> Result<(), DomainError>;
}
