// ============================================================================
// Sportmeet Infrastructure - PostgreSQL Session Repository
// File: crates/sportmeet-infrastructure/src/database/postgres/session_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};

use sportmeet_core::domain::{NewSession, Session};
use sportmeet_core::error::DomainError;
use sportmeet_core::repositories::SessionRepository;
use sportmeet_shared::EntityId;

use super::db_error;

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SessionRow {
    id: i32,
    token: String,
    user_id: i32,
    expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            session_id: row.id,
            token: row.token,
            user_id: row.user_id,
            expires_at: row.expires_at,
        }
    }
}

const INSERT_SESSION: &str = r#"
    INSERT INTO sessions (token, user_id, expires_at)
    VALUES ($1, $2, $3)
    RETURNING id, token, user_id, expires_at
"#;

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, session: NewSession) -> Result<Session, DomainError> {
        let row: SessionRow = sqlx::query_as(INSERT_SESSION)
            .bind(&session.token)
            .bind(session.user_id)
            .bind(session.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("creating session"))?;

        Ok(row.into())
    }

    async fn find(&self, session_id: EntityId, token: &str) -> Result<Option<Session>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT id, token, user_id, expires_at FROM sessions WHERE id = $1 AND token = $2",
        )
        .bind(session_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding session"))?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, session_id: EntityId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("deleting session"))?;

        if result.rows_affected() == 0 {
            debug!(session_id, "Session already gone");
        }
        Ok(())
    }

    async fn rotate(&self, old_session_id: EntityId, replacement: NewSession) -> Result<Session, DomainError> {
        let mut transaction = self.pool.begin().await.map_err(db_error("starting rotation"))?;

        let row: SessionRow = sqlx::query_as(INSERT_SESSION)
            .bind(&replacement.token)
            .bind(replacement.user_id)
            .bind(replacement.expires_at)
            .fetch_one(&mut *transaction)
            .await
            .map_err(db_error("inserting rotated session"))?;

        let deleted = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(old_session_id)
            .execute(&mut *transaction)
            .await
            .map_err(db_error("deleting rotated session"))?;

        // Dropping the transaction without commit rolls the insert back.
        if deleted.rows_affected() == 0 {
            warn!(old_session_id, "Rotation lost the race, old session already deleted");
            return Err(DomainError::SessionNotFound);
        }

        transaction.commit().await.map_err(db_error("committing rotation"))?;
        Ok(row.into())
    }
}
