// ============================================================================
// Sportmeet Infrastructure - PostgreSQL User Repository
// File: crates/sportmeet-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};

use sportmeet_core::domain::{NewUser, UpdateUser, User};
use sportmeet_core::error::DomainError;
use sportmeet_core::repositories::UserRepository;
use sportmeet_shared::EntityId;

use super::db_error;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: i32,
    pub email: String,
    pub user_name: String,
    pub password: String,
    pub avatar: String,
    pub full_name: String,
    pub about: String,
    pub sports: Vec<String>,
    pub followers_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            user_name: row.user_name,
            password_hash: row.password,
            avatar: row.avatar,
            full_name: row.full_name,
            about: row.about,
            sports: row.sports,
            followers_count: row.followers_count,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, email, user_name, password, avatar, full_name, about, sports, followers_count, created_at";

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("finding user by id"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("finding user by email"))?;

        Ok(row.map(|r| r.into()))
    }

    async fn exists_by_email_or_user_name(&self, email: &str, user_name: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) OR user_name = $2)",
        )
        .bind(email)
        .bind(user_name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("checking user uniqueness"))
    }

    async fn find_many(&self, limit: i64) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1"))
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("listing users"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (email, user_name, password, avatar, full_name, about, sports)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.email)
        .bind(&user.user_name)
        .bind(&user.password_hash)
        .bind(&user.avatar)
        .bind(&user.full_name)
        .bind(&user.about)
        .bind(&user.sports)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::EmailOrUserNameTaken,
            _ => {
                error!("Database error creating user: {}", e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        info!(user_id = row.id, "User row created");
        Ok(row.into())
    }

    async fn update_password(&self, id: EntityId, password_hash: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET password = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(db_error("updating password"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound);
        }
        Ok(())
    }

    async fn update_profile(&self, update: UpdateUser) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                user_name = COALESCE($3, user_name),
                avatar = COALESCE($4, avatar),
                full_name = COALESCE($5, full_name),
                about = COALESCE($6, about),
                sports = COALESCE($7, sports)
            WHERE id = $1
            "#,
        )
        .bind(update.id)
        .bind(&update.email)
        .bind(&update.user_name)
        .bind(&update.avatar)
        .bind(&update.full_name)
        .bind(&update.about)
        .bind(&update.sports)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::EmailOrUserNameTaken,
            _ => {
                error!("Database error updating profile: {}", e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound);
        }
        Ok(())
    }

    async fn delete_with_dependents(&self, id: EntityId) -> Result<(), DomainError> {
        let mut transaction = self.pool.begin().await.map_err(db_error("starting user deletion"))?;

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(id)
            .execute(&mut *transaction)
            .await
            .map_err(db_error("deleting user sessions"))?;

        sqlx::query("DELETE FROM notification_tokens WHERE user_id = $1")
            .bind(id)
            .execute(&mut *transaction)
            .await
            .map_err(db_error("deleting user push tokens"))?;

        sqlx::query("DELETE FROM event_members WHERE user_id = $1")
            .bind(id)
            .execute(&mut *transaction)
            .await
            .map_err(db_error("deleting user memberships"))?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *transaction)
            .await
            .map_err(db_error("deleting user"))?;

        if deleted.rows_affected() == 0 {
            return Err(DomainError::UserNotFound);
        }

        transaction.commit().await.map_err(db_error("committing user deletion"))?;
        Ok(())
    }

    async fn add_notification_token(&self, user_id: EntityId, token: &str) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO notification_tokens (token, user_id) VALUES ($1, $2)")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("saving push token"))?;
        Ok(())
    }
}
