//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User is not found")]
    UserNotFound,

    #[error("Event is not found")]
    EventNotFound,

    #[error("Session is not found")]
    SessionNotFound,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Email and userName must be unique")]
    EmailOrUserNameTaken,

    #[error("Password is incorrect")]
    WrongPassword,

    #[error("Passwords are equal")]
    PasswordsEqual,

    #[error("Access is denied")]
    AccessDenied,

    #[error("Update at least one field")]
    NothingToUpdate,

    #[error("Max members count is {0}")]
    TooManyMembers(i32),

    #[error("Unknown event member")]
    UnknownMember,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Failed to create session")]
    SessionCreationFailed,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token configuration error: {0}")]
    TokenConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<sportmeet_security::PasswordError> for DomainError {
    fn from(e: sportmeet_security::PasswordError) -> Self {
        DomainError::PasswordHashError(e.to_string())
    }
}

impl From<sportmeet_security::TokenError> for DomainError {
    fn from(e: sportmeet_security::TokenError) -> Self {
        DomainError::TokenConfigError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(e: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(e.to_string())
    }
}
