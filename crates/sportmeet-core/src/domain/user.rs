// ============================================================================
// Sportmeet Core - User Entity
// File: crates/sportmeet-core/src/domain/user.rs
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sportmeet_shared::EntityId;
use validator::Validate;

/// User row as stored, password hash included. Never serialized.
#[derive(Debug, Clone)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    pub user_name: String,
    pub password_hash: String,
    pub avatar: String,
    pub full_name: String,
    pub about: String,
    pub sports: Vec<String>,
    pub followers_count: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Public view of a user: what handlers return and what warm-up caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: EntityId,
    pub email: String,
    pub user_name: String,
    pub avatar: String,
    pub full_name: String,
    pub about: String,
    pub sports: Vec<String>,
    pub followers_count: i32,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            avatar: user.avatar.clone(),
            full_name: user.full_name.clone(),
            about: user.about.clone(),
            sports: user.sports.clone(),
            followers_count: user.followers_count,
        }
    }
}

/// Registration input, validated before anything touches the store.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(email, length(min = 5, max = 55))]
    pub email: String,

    #[validate(length(min = 3, max = 30))]
    pub user_name: String,

    #[validate(length(min = 6, max = 20))]
    pub password: String,

    #[validate(url)]
    pub avatar: String,

    #[validate(length(min = 5, max = 50))]
    pub full_name: String,

    #[validate(length(min = 1, max = 1000))]
    pub about: String,

    #[validate(custom(function = "validate_sports"))]
    pub sports: Vec<String>,

    pub expo_push_token: Option<String>,
}

#[allow(clippy::ptr_arg)]
fn validate_sports(sports: &Vec<String>) -> Result<(), validator::ValidationError> {
    if sports.iter().all(|s| (2..=30).contains(&s.chars().count())) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("sport_name_length"))
    }
}

/// Partial profile update. `id` names the target; at least one other field
/// must be present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub id: EntityId,

    #[validate(email, length(min = 5, max = 55))]
    pub email: Option<String>,

    #[validate(length(min = 3, max = 30))]
    pub user_name: Option<String>,

    #[validate(url)]
    pub avatar: Option<String>,

    #[validate(length(min = 5, max = 50))]
    pub full_name: Option<String>,

    #[validate(length(min = 1, max = 1000))]
    pub about: Option<String>,

    #[validate(custom(function = "validate_sports"))]
    pub sports: Option<Vec<String>>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.user_name.is_none()
            && self.avatar.is_none()
            && self.full_name.is_none()
            && self.about.is_none()
            && self.sports.is_none()
    }

    /// Same normalization as registration.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.map(|e| e.trim().to_lowercase());
        self.user_name = self.user_name.map(|u| u.trim().to_string());
        self.avatar = self.avatar.map(|a| a.trim().to_string());
        self.full_name = self.full_name.map(|f| f.trim().to_string());
        self
    }
}

/// Insert payload with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub user_name: String,
    pub password_hash: String,
    pub avatar: String,
    pub full_name: String,
    pub about: String,
    pub sports: Vec<String>,
}

impl NewUser {
    pub fn from_registration(data: &RegisterUser, password_hash: String) -> Self {
        Self {
            email: data.email.trim().to_lowercase(),
            user_name: data.user_name.trim().to_string(),
            password_hash,
            avatar: data.avatar.trim().to_string(),
            full_name: data.full_name.trim().to_string(),
            about: data.about.clone(),
            sports: data.sports.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegisterUser {
        RegisterUser {
            email: "Pantus@Oleg.com".to_string(),
            user_name: "olezha".to_string(),
            password: "NA$At00r".to_string(),
            avatar: "https://cdn.example.com/a.png".to_string(),
            full_name: "Oleg Pantus".to_string(),
            about: "Volleyball on weekends".to_string(),
            sports: vec!["volleyball".to_string(), "running".to_string()],
            expo_push_token: None,
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn test_invalid_registration_fields() {
        let mut data = registration();
        data.email = "nope".to_string();
        assert!(data.validate().is_err());

        let mut data = registration();
        data.sports = vec!["x".to_string()];
        assert!(data.validate().is_err());

        let mut data = registration();
        data.password = "short".to_string();
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_update_user_emptiness_and_validation() {
        let update = UpdateUser { id: 1, ..Default::default() };
        assert!(update.is_empty());
        assert!(update.validate().is_ok());

        let update = UpdateUser {
            id: 1,
            email: Some(" New@Mail.com ".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(update.normalized().email.as_deref(), Some("new@mail.com"));

        let update = UpdateUser {
            id: 1,
            sports: Some(vec!["x".to_string()]),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_new_user_normalizes_email() {
        let user = NewUser::from_registration(&registration(), "hash".to_string());
        assert_eq!(user.email, "pantus@oleg.com");
        assert_eq!(user.password_hash, "hash");
    }
}
