//! Process-wide store handles, opened once and closed on shutdown.

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use tracing::info;

use sportmeet_api::Ports;
use sportmeet_infrastructure::{
    create_pool, ensure_schema, init_redis, MemoryCache, MemoryDatabase, MemoryEventRepository,
    MemorySessionRepository, MemoryUserRepository, PgEventRepository, PgSessionRepository, PgUserRepository,
    RedisCache,
};
use sportmeet_shared::config::{AppConfig, StorageBackend};

pub enum StoreHandles {
    Postgres { pool: PgPool, cache: RedisCache },
    Memory { db: Arc<MemoryDatabase>, cache: Arc<MemoryCache> },
}

impl StoreHandles {
    pub async fn open(config: &AppConfig) -> anyhow::Result<Self> {
        match config.app.storage {
            StorageBackend::Postgres => {
                info!("Connecting to database...");
                let pool = create_pool(&config.database)
                    .await
                    .context("Failed to connect to PostgreSQL")?;
                ensure_schema(&pool).await.context("Failed to ensure database schema")?;
                info!("Database connection established.");

                let connection = init_redis(&config.redis)
                    .await
                    .context("Failed to connect to Redis")?;

                Ok(Self::Postgres { pool, cache: RedisCache::new(connection) })
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage; data is lost on restart");
                Ok(Self::Memory {
                    db: MemoryDatabase::new(),
                    cache: Arc::new(MemoryCache::new()),
                })
            }
        }
    }

    pub fn ports(&self) -> Ports {
        match self {
            Self::Postgres { pool, cache } => Ports {
                users: Arc::new(PgUserRepository::new(pool.clone())),
                sessions: Arc::new(PgSessionRepository::new(pool.clone())),
                events: Arc::new(PgEventRepository::new(pool.clone())),
                cache: Arc::new(cache.clone()),
            },
            Self::Memory { db, cache } => Ports {
                users: Arc::new(MemoryUserRepository::new(db.clone())),
                sessions: Arc::new(MemorySessionRepository::new(db.clone())),
                events: Arc::new(MemoryEventRepository::new(db.clone())),
                cache: cache.clone(),
            },
        }
    }

    pub async fn close(self) {
        if let Self::Postgres { pool, .. } = self {
            pool.close().await;
            info!("Database pool closed");
        }
    }
}
