//! Profile lookup and update, account deletion and password change.
//!
//! Every mutating call here acts on the caller's own account. The caller id
//! comes from the validated session, never from the request body alone.

use std::sync::Arc;

use sportmeet_security::PasswordService;
use sportmeet_shared::EntityId;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::{UpdateUser, User};
use crate::error::DomainError;
use crate::repositories::UserRepository;

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn find_one(&self, id: EntityId) -> Result<User, DomainError> {
        self.users.find_by_id(id).await?.ok_or(DomainError::UserNotFound)
    }

    /// Delete `target_id` with its sessions and push tokens.
    pub async fn delete(&self, caller_id: EntityId, target_id: EntityId, password: &str) -> Result<(), DomainError> {
        if caller_id != target_id {
            warn!(caller_id, target_id, "Refused to delete another user");
            return Err(DomainError::AccessDenied);
        }

        let user = self.find_one(target_id).await?;
        self.check_password(&user, password)?;

        self.users.delete_with_dependents(user.id).await?;
        info!(user_id = user.id, "User deleted");
        Ok(())
    }

    pub async fn update_profile(&self, caller_id: EntityId, update: UpdateUser) -> Result<(), DomainError> {
        if caller_id != update.id {
            warn!(caller_id, target_id = update.id, "Refused to update another user's profile");
            return Err(DomainError::AccessDenied);
        }
        if update.is_empty() {
            return Err(DomainError::NothingToUpdate);
        }
        update.validate()?;

        let user_id = update.id;
        self.users.update_profile(update.normalized()).await?;
        info!(user_id, "Profile updated");
        Ok(())
    }

    pub async fn update_password(
        &self,
        caller_id: EntityId,
        target_id: EntityId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        if caller_id != target_id {
            warn!(caller_id, target_id, "Refused to change another user's password");
            return Err(DomainError::AccessDenied);
        }
        if old_password == new_password {
            return Err(DomainError::PasswordsEqual);
        }

        let user = self.find_one(target_id).await?;
        self.check_password(&user, old_password)?;

        let hash = PasswordService::hash_password(new_password)?;
        self.users.update_password(user.id, &hash).await?;
        info!(user_id = user.id, "Password updated");
        Ok(())
    }

    fn check_password(&self, user: &User, password: &str) -> Result<(), DomainError> {
        if PasswordService::validate_password(password, &user.password_hash)? {
            Ok(())
        } else {
            Err(DomainError::WrongPassword)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepository;
    use chrono::Utc;

    fn user(id: EntityId, password: &str) -> User {
        User {
            id,
            email: format!("user{id}@sport.io"),
            user_name: format!("user{id}"),
            password_hash: PasswordService::hash_password(password).unwrap(),
            avatar: "https://cdn.example.com/a.png".to_string(),
            full_name: "Some Player".to_string(),
            about: "about".to_string(),
            sports: vec![],
            followers_count: 0,
            created_at: Utc::now(),
        }
    }

    fn repo_with(stored: User) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |id| Ok((id == stored.id).then(|| stored.clone())));
        users
    }

    #[tokio::test]
    async fn test_find_one_missing_user() {
        let service = UserService::new(Arc::new(repo_with(user(1, "secret1"))));
        assert!(service.find_one(1).await.is_ok());
        assert!(matches!(service.find_one(2).await, Err(DomainError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_delete_requires_self_and_password() {
        let mut users = repo_with(user(4, "secret1"));
        users
            .expect_delete_with_dependents()
            .withf(|id| *id == 4)
            .times(1)
            .returning(|_| Ok(()));
        let service = UserService::new(Arc::new(users));

        assert!(matches!(service.delete(5, 4, "secret1").await, Err(DomainError::AccessDenied)));
        assert!(matches!(service.delete(4, 4, "wrong!!").await, Err(DomainError::WrongPassword)));
        service.delete(4, 4, "secret1").await.unwrap();
    }

    #[tokio::test]
    async fn test_update_password_rules() {
        let mut users = repo_with(user(8, "secret1"));
        users
            .expect_update_password()
            .withf(|id, hash| *id == 8 && hash.starts_with("$argon2"))
            .times(1)
            .returning(|_, _| Ok(()));
        let service = UserService::new(Arc::new(users));

        assert!(matches!(
            service.update_password(8, 8, "secret1", "secret1").await,
            Err(DomainError::PasswordsEqual)
        ));
        assert!(matches!(
            service.update_password(8, 8, "nope123", "secret2").await,
            Err(DomainError::WrongPassword)
        ));
        assert!(matches!(
            service.update_password(9, 8, "secret1", "secret2").await,
            Err(DomainError::AccessDenied)
        ));
        service.update_password(8, 8, "secret1", "secret2").await.unwrap();
    }

    #[tokio::test]
    async fn test_update_profile_rules() {
        let mut users = MockUserRepository::new();
        users
            .expect_update_profile()
            .withf(|update| update.id == 3 && update.email.as_deref() == Some("new@sport.io"))
            .times(1)
            .returning(|_| Ok(()));
        let service = UserService::new(Arc::new(users));

        let empty = UpdateUser { id: 3, ..Default::default() };
        assert!(matches!(
            service.update_profile(3, empty).await,
            Err(DomainError::NothingToUpdate)
        ));

        let update = UpdateUser {
            id: 3,
            email: Some("New@Sport.io".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_profile(4, update.clone()).await,
            Err(DomainError::AccessDenied)
        ));

        let invalid = UpdateUser {
            id: 3,
            avatar: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_profile(3, invalid).await,
            Err(DomainError::ValidationError(_))
        ));

        service.update_profile(3, update).await.unwrap();
    }
}
