// ============================================================================
// Sportmeet Core - Authentication Service
// File: crates/sportmeet-core/src/services/auth_service.rs
// ============================================================================
//! Login and registration. Starting the session is the caller's job.

use std::sync::Arc;

use sportmeet_security::PasswordService;
use sportmeet_shared::utils::mask_email;
use sportmeet_shared::EntityId;
use tracing::{error, info, warn};
use validator::Validate;

use crate::domain::{NewUser, RegisterUser, User};
use crate::error::DomainError;
use crate::repositories::UserRepository;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Check email and password. Unknown email and wrong password are the
    /// same error.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        expo_push_token: Option<&str>,
    ) -> Result<User, DomainError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.users.find_by_email(&email).await? else {
            PasswordService::reject_unknown_account(password);
            info!("Login failed: unknown email {}", mask_email(&email));
            return Err(DomainError::InvalidCredentials);
        };

        if !PasswordService::validate_password(password, &user.password_hash)? {
            info!("Login failed: wrong password for {}", mask_email(&email));
            return Err(DomainError::InvalidCredentials);
        }

        self.save_push_token(user.id, expo_push_token).await;

        info!(user_id = user.id, "Login successful");
        Ok(user)
    }

    pub async fn register(&self, data: RegisterUser) -> Result<User, DomainError> {
        data.validate()?;

        let email = data.email.trim().to_lowercase();
        if self
            .users
            .exists_by_email_or_user_name(&email, data.user_name.trim())
            .await?
        {
            warn!("Registration rejected: email or userName taken ({})", mask_email(&email));
            return Err(DomainError::EmailOrUserNameTaken);
        }

        let password_hash = PasswordService::hash_password(&data.password)?;
        let user = self
            .users
            .create(NewUser::from_registration(&data, password_hash))
            .await
            .map_err(|e| {
                error!("Failed to create user: {}", e);
                e
            })?;

        self.save_push_token(user.id, data.expo_push_token.as_deref()).await;

        info!(user_id = user.id, "Registration successful");
        Ok(user)
    }

    /// Best effort, at most once: a failed insert is logged and dropped so it
    /// never fails the login or registration that triggered it.
    async fn save_push_token(&self, user_id: EntityId, token: Option<&str>) {
        let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
            return;
        };
        if let Err(e) = self.users.add_notification_token(user_id, token).await {
            warn!(user_id, "Failed to save push token: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepository;
    use chrono::Utc;

    fn stored_user(password: &str) -> User {
        User {
            id: 1,
            email: "pantus@oleg.com".to_string(),
            user_name: "olezha".to_string(),
            password_hash: PasswordService::hash_password(password).unwrap(),
            avatar: "https://cdn.example.com/a.png".to_string(),
            full_name: "Oleg Pantus".to_string(),
            about: "about".to_string(),
            sports: vec!["volleyball".to_string()],
            followers_count: 3,
            created_at: Utc::now(),
        }
    }

    fn registration() -> RegisterUser {
        RegisterUser {
            email: "new@sport.io".to_string(),
            user_name: "newbie".to_string(),
            password: "password".to_string(),
            avatar: "https://cdn.example.com/b.png".to_string(),
            full_name: "New Player".to_string(),
            about: "hi".to_string(),
            sports: vec!["tennis".to_string()],
            expo_push_token: Some("ExponentPushToken[abc]".to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_success_saves_push_token() {
        let user = stored_user("NA$At00r");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .withf(|email| email == "pantus@oleg.com")
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_add_notification_token()
            .times(1)
            .returning(|_, _| Ok(()));

        let service = AuthService::new(Arc::new(users));
        let user = service
            .login(" Pantus@Oleg.com ", "NA$At00r", Some("ExponentPushToken[x]"))
            .await
            .unwrap();
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_the_same() {
        let user = stored_user("NA$At00r");
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |email| {
            Ok((email == "pantus@oleg.com").then(|| user.clone()))
        });

        let service = AuthService::new(Arc::new(users));
        let wrong = service.login("pantus@oleg.com", "nope", None).await;
        let unknown = service.login("ghost@oleg.com", "NA$At00r", None).await;

        assert!(matches!(wrong, Err(DomainError::InvalidCredentials)));
        assert!(matches!(unknown, Err(DomainError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_push_token_failure_does_not_fail_registration() {
        let mut users = MockUserRepository::new();
        users.expect_exists_by_email_or_user_name().returning(|_, _| Ok(false));
        users.expect_create().returning(|new_user| {
            Ok(User {
                id: 77,
                email: new_user.email,
                user_name: new_user.user_name,
                password_hash: new_user.password_hash,
                avatar: new_user.avatar,
                full_name: new_user.full_name,
                about: new_user.about,
                sports: new_user.sports,
                followers_count: 0,
                created_at: Utc::now(),
            })
        });
        users
            .expect_add_notification_token()
            .times(1)
            .returning(|_, _| Err(DomainError::DatabaseError("unique violation".to_string())));

        let service = AuthService::new(Arc::new(users));
        let user = service.register(registration()).await.unwrap();
        assert_eq!(user.id, 77);
        assert_ne!(user.password_hash, "password");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_invalid_payloads() {
        let mut users = MockUserRepository::new();
        users.expect_exists_by_email_or_user_name().returning(|_, _| Ok(true));
        users.expect_create().never();

        let service = AuthService::new(Arc::new(users));
        assert!(matches!(
            service.register(registration()).await,
            Err(DomainError::EmailOrUserNameTaken)
        ));

        let mut invalid = registration();
        invalid.email = "not-an-email".to_string();
        assert!(matches!(
            service.register(invalid).await,
            Err(DomainError::ValidationError(_))
        ));
    }
}
