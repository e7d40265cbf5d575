//! Request and response bodies that are not domain types.

use serde::{Deserialize, Serialize};
use sportmeet_shared::EntityId;
use validator::Validate;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters"))]
    pub password: String,

    pub expo_push_token: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub id: EntityId,

    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters"))]
    pub old_password: String,

    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserQuery {
    pub id: EntityId,
    pub password: String,
}

/// `?except=0,3` on the random feeds.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub except: Option<String>,
}

impl FeedQuery {
    /// Comma-separated batch indices; blanks are skipped.
    pub fn excluded(&self) -> Result<Vec<usize>, ApiError> {
        let Some(raw) = self.except.as_deref() else {
            return Ok(Vec::new());
        };
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<usize>()
                    .map_err(|_| ApiError::BadRequest(format!("Invalid batch index: {part}")))
            })
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OnlineStatus {
    pub online: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(except: Option<&str>) -> FeedQuery {
        FeedQuery { except: except.map(str::to_string) }
    }

    #[test]
    fn test_excluded_parsing() {
        assert_eq!(query(None).excluded().unwrap(), Vec::<usize>::new());
        assert_eq!(query(Some("")).excluded().unwrap(), Vec::<usize>::new());
        assert_eq!(query(Some("0,3")).excluded().unwrap(), vec![0, 3]);
        assert_eq!(query(Some(" 1 , ,2,")).excluded().unwrap(), vec![1, 2]);
        assert!(matches!(query(Some("1,x")).excluded(), Err(ApiError::BadRequest(_))));
        assert!(query(Some("-1")).excluded().is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"email":"pantus@oleg.com","password":"NA$At00r"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.expo_push_token.is_none());

        let request: LoginRequest = serde_json::from_str(r#"{"email":"pantus","password":"x"}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
