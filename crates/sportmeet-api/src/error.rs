use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sportmeet_core::DomainError;
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The detail is logged and never sent to the client.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UserNotFound | DomainError::EventNotFound | DomainError::SessionNotFound => {
                ApiError::NotFound(e.to_string())
            }
            DomainError::InvalidCredentials
            | DomainError::EmailOrUserNameTaken
            | DomainError::WrongPassword
            | DomainError::PasswordsEqual
            | DomainError::NothingToUpdate
            | DomainError::TooManyMembers(_)
            | DomainError::UnknownMember
            | DomainError::ValidationError(_) => ApiError::BadRequest(e.to_string()),
            DomainError::AccessDenied => ApiError::Forbidden(e.to_string()),
            DomainError::SessionCreationFailed
            | DomainError::PasswordHashError(_)
            | DomainError::TokenConfigError(_)
            | DomainError::DatabaseError(_)
            | DomainError::CacheError(_)
            | DomainError::InternalError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, message) = match self {
            ApiError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                ("NotFound", msg)
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                ("Forbidden", msg)
            }
            ApiError::BadRequest(msg) => {
                tracing::debug!("Bad request: {}", msg);
                ("BadRequest", msg)
            }
            ApiError::Unauthorized(msg) => {
                tracing::debug!("Unauthorized: {}", msg);
                ("Unauthorized", msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal", INTERNAL_MESSAGE.to_string())
            }
        };

        (status, Json(ErrorResponse { error: error_type, message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_status() {
        let cases = [
            (DomainError::UserNotFound, StatusCode::NOT_FOUND),
            (DomainError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (DomainError::PasswordsEqual, StatusCode::BAD_REQUEST),
            (DomainError::AccessDenied, StatusCode::FORBIDDEN),
            (DomainError::NothingToUpdate, StatusCode::BAD_REQUEST),
            (DomainError::TooManyMembers(4), StatusCode::BAD_REQUEST),
            (DomainError::SessionCreationFailed, StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::CacheError("down".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (domain, status) in cases {
            assert_eq!(ApiError::from(domain).status(), status);
        }
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let response = ApiError::Internal("password authentication failed for user postgres".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains(INTERNAL_MESSAGE));
        assert!(!body.contains("postgres"));
    }
}
