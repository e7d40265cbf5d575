//! PostgreSQL repository implementations

pub mod event_repo_impl;
pub mod session_repo_impl;
pub mod user_repo_impl;

pub use event_repo_impl::PgEventRepository;
pub use session_repo_impl::PgSessionRepository;
pub use user_repo_impl::PgUserRepository;

use sportmeet_core::error::DomainError;
use tracing::error;

/// Log and wrap a driver error; `context` names the failed operation.
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}
