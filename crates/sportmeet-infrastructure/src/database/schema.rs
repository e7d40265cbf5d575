//! Idempotent schema bootstrap, run once at startup.

use sqlx::PgPool;
use tracing::debug;

const TABLES: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        email VARCHAR(55) NOT NULL UNIQUE,
        user_name VARCHAR(30) NOT NULL UNIQUE,
        password TEXT NOT NULL,
        avatar TEXT NOT NULL,
        full_name VARCHAR(50) NOT NULL,
        about TEXT NOT NULL DEFAULT '',
        sports TEXT[] NOT NULL DEFAULT '{}',
        followers_count INT NOT NULL DEFAULT 0,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS sessions (
        id SERIAL PRIMARY KEY,
        token TEXT NOT NULL,
        user_id INT NOT NULL REFERENCES users(id),
        expires_at TIMESTAMP WITH TIME ZONE NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS notification_tokens (
        id SERIAL PRIMARY KEY,
        token TEXT NOT NULL UNIQUE,
        user_id INT NOT NULL REFERENCES users(id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS locations (
        id SERIAL PRIMARY KEY,
        latitude DOUBLE PRECISION NOT NULL,
        longitude DOUBLE PRECISION NOT NULL,
        info TEXT
    )"#,
    r#"CREATE TABLE IF NOT EXISTS events (
        id SERIAL PRIMARY KEY,
        title VARCHAR(100) NOT NULL,
        about TEXT NOT NULL DEFAULT '',
        sports TEXT[] NOT NULL DEFAULT '{}',
        photo TEXT NOT NULL,
        video TEXT,
        date TIMESTAMP WITH TIME ZONE NOT NULL,
        private BOOLEAN NOT NULL DEFAULT FALSE,
        likes_count INT NOT NULL DEFAULT 0,
        members_count INT NOT NULL DEFAULT 0,
        comments_count INT NOT NULL DEFAULT 0,
        max_members_count INT NOT NULL,
        creator_id INT NOT NULL REFERENCES users(id),
        location_id INT REFERENCES locations(id),
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS event_members (
        event_id INT NOT NULL REFERENCES events(id),
        user_id INT NOT NULL REFERENCES users(id),
        PRIMARY KEY (event_id, user_id)
    )"#,
];

const INDICES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_notification_tokens_user ON notification_tokens(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_event_members_user ON event_members(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_events_public_date ON events(date DESC) WHERE private = FALSE",
];

pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in TABLES.iter().chain(INDICES) {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!("Database schema ensured");
    Ok(())
}
