//! PostgreSQL event repository. Every read joins creator and location.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::error;

use sportmeet_core::domain::{CreateEvent, Event, Location, NewLocation, UpdateEvent, UserProfile};
use sportmeet_core::error::DomainError;
use sportmeet_core::repositories::EventRepository;
use sportmeet_shared::EntityId;

use super::db_error;

pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_location(
        transaction: &mut Transaction<'_, Postgres>,
        location: &NewLocation,
    ) -> Result<i32, DomainError> {
        sqlx::query_scalar("INSERT INTO locations (latitude, longitude, info) VALUES ($1, $2, $3) RETURNING id")
            .bind(location.latitude)
            .bind(location.longitude)
            .bind(&location.info)
            .fetch_one(&mut **transaction)
            .await
            .map_err(db_error("inserting location"))
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: i32,
    title: String,
    about: String,
    sports: Vec<String>,
    photo: String,
    video: Option<String>,
    date: DateTime<Utc>,
    private: bool,
    likes_count: i32,
    members_count: i32,
    comments_count: i32,
    max_members_count: i32,
    creator_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    // creator
    creator_email: String,
    creator_user_name: String,
    creator_avatar: String,
    creator_full_name: String,
    creator_about: String,
    creator_sports: Vec<String>,
    creator_followers_count: i32,
    // location
    location_id: Option<i32>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    location_info: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        let location = match (row.location_id, row.latitude, row.longitude) {
            (Some(id), Some(latitude), Some(longitude)) => Some(Location {
                id,
                latitude,
                longitude,
                info: row.location_info,
            }),
            _ => None,
        };

        Event {
            id: row.id,
            title: row.title,
            about: row.about,
            sports: row.sports,
            photo: row.photo,
            video: row.video,
            date: row.date,
            private: row.private,
            likes_count: row.likes_count,
            members_count: row.members_count,
            comments_count: row.comments_count,
            max_members_count: row.max_members_count,
            creator_id: row.creator_id,
            creator: Some(UserProfile {
                id: row.creator_id,
                email: row.creator_email,
                user_name: row.creator_user_name,
                avatar: row.creator_avatar,
                full_name: row.creator_full_name,
                about: row.creator_about,
                sports: row.creator_sports,
                followers_count: row.creator_followers_count,
            }),
            location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const EVENT_SELECT: &str = r#"
    SELECT
        e.id, e.title, e.about, e.sports, e.photo, e.video, e.date, e.private,
        e.likes_count, e.members_count, e.comments_count, e.max_members_count,
        e.creator_id, e.created_at, e.updated_at,
        u.email AS creator_email, u.user_name AS creator_user_name,
        u.avatar AS creator_avatar, u.full_name AS creator_full_name,
        u.about AS creator_about, u.sports AS creator_sports,
        u.followers_count AS creator_followers_count,
        l.id AS location_id, l.latitude, l.longitude, l.info AS location_info
    FROM events e
    JOIN users u ON u.id = e.creator_id
    LEFT JOIN locations l ON l.id = e.location_id
"#;

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Event>, DomainError> {
        let row: Option<EventRow> = sqlx::query_as(&format!("{EVENT_SELECT} WHERE e.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("finding event"))?;

        Ok(row.map(Into::into))
    }

    async fn find_public(&self, limit: i64) -> Result<Vec<Event>, DomainError> {
        let rows: Vec<EventRow> =
            sqlx::query_as(&format!("{EVENT_SELECT} WHERE e.private = FALSE ORDER BY e.date DESC LIMIT $1"))
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("listing public events"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, creator_id: EntityId, data: CreateEvent) -> Result<Event, DomainError> {
        let members = data.distinct_members();
        let mut transaction = self.pool.begin().await.map_err(db_error("starting event creation"))?;

        let location_id = Self::insert_location(&mut transaction, &data.location).await?;

        let event_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO events (
                title, about, sports, photo, video, date, private,
                max_members_count, members_count, creator_id, location_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(&data.about)
        .bind(&data.sports)
        .bind(&data.photo)
        .bind(&data.video)
        .bind(data.date)
        .bind(data.private)
        .bind(data.max_members_count)
        .bind(members.len() as i32)
        .bind(creator_id)
        .bind(location_id)
        .fetch_one(&mut *transaction)
        .await
        .map_err(db_error("inserting event"))?;

        sqlx::query(
            "INSERT INTO event_members (event_id, user_id) SELECT $1, UNNEST($2::int[]) ON CONFLICT DO NOTHING",
        )
        .bind(event_id)
        .bind(&members)
        .execute(&mut *transaction)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => DomainError::UnknownMember,
            _ => {
                error!("Database error inserting event members: {}", e);
                DomainError::DatabaseError(e.to_string())
            }
        })?;

        transaction.commit().await.map_err(db_error("committing event creation"))?;

        self.find_by_id(event_id).await?.ok_or(DomainError::EventNotFound)
    }

    async fn update(&self, update: UpdateEvent) -> Result<(), DomainError> {
        let mut transaction = self.pool.begin().await.map_err(db_error("starting event update"))?;

        let location_id: Option<Option<i32>> = sqlx::query_scalar(
            r#"
            UPDATE events SET
                title = COALESCE($2, title),
                about = COALESCE($3, about),
                sports = COALESCE($4, sports),
                photo = COALESCE($5, photo),
                video = COALESCE($6, video),
                date = COALESCE($7, date),
                private = COALESCE($8, private),
                max_members_count = COALESCE($9, max_members_count),
                updated_at = NOW()
            WHERE id = $1
            RETURNING location_id
            "#,
        )
        .bind(update.id)
        .bind(&update.title)
        .bind(&update.about)
        .bind(&update.sports)
        .bind(&update.photo)
        .bind(&update.video)
        .bind(update.date)
        .bind(update.private)
        .bind(update.max_members_count)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(db_error("updating event"))?;

        let Some(location_id) = location_id else {
            return Err(DomainError::EventNotFound);
        };

        if let Some(location) = &update.location {
            match location_id {
                Some(location_id) => {
                    sqlx::query("UPDATE locations SET latitude = $2, longitude = $3, info = $4 WHERE id = $1")
                        .bind(location_id)
                        .bind(location.latitude)
                        .bind(location.longitude)
                        .bind(&location.info)
                        .execute(&mut *transaction)
                        .await
                        .map_err(db_error("updating location"))?;
                }
                None => {
                    let location_id = Self::insert_location(&mut transaction, location).await?;
                    sqlx::query("UPDATE events SET location_id = $2 WHERE id = $1")
                        .bind(update.id)
                        .bind(location_id)
                        .execute(&mut *transaction)
                        .await
                        .map_err(db_error("linking location"))?;
                }
            }
        }

        transaction.commit().await.map_err(db_error("committing event update"))?;
        Ok(())
    }

    async fn delete_with_dependents(&self, id: EntityId) -> Result<(), DomainError> {
        let mut transaction = self.pool.begin().await.map_err(db_error("starting event deletion"))?;

        sqlx::query("DELETE FROM event_members WHERE event_id = $1")
            .bind(id)
            .execute(&mut *transaction)
            .await
            .map_err(db_error("deleting event members"))?;

        let location_id: Option<Option<i32>> =
            sqlx::query_scalar("DELETE FROM events WHERE id = $1 RETURNING location_id")
                .bind(id)
                .fetch_optional(&mut *transaction)
                .await
                .map_err(db_error("deleting event"))?;

        let Some(location_id) = location_id else {
            return Err(DomainError::EventNotFound);
        };

        if let Some(location_id) = location_id {
            sqlx::query("DELETE FROM locations WHERE id = $1")
                .bind(location_id)
                .execute(&mut *transaction)
                .await
                .map_err(db_error("deleting location"))?;
        }

        transaction.commit().await.map_err(db_error("committing event deletion"))?;
        Ok(())
    }
}
