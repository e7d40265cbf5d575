//! # Redis
//!
//! Holds the pre-serialized discovery batches (`users/{i}`, `events/{i}`),
//! their counts (`{collection}/count`) and the presence flags
//! (`onlineUsers/{id}`). Plain string keys, no expiry: warm-up overwrites
//! the batches and deletes the ones it no longer produces.

use std::time::Duration;

use async_trait::async_trait;
use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client, RedisError,
};
use tracing::{error, info};

use sportmeet_core::error::DomainError;
use sportmeet_core::repositories::CacheStore;
use sportmeet_shared::config::RedisSettings;

pub async fn init_redis(settings: &RedisSettings) -> Result<ConnectionManager, RedisError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Some(Duration::from_millis(settings.connection_timeout_ms)));

    let client = Client::open(settings.url.as_str())?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    info!("Redis connection manager ready");
    Ok(connection_manager)
}

/// `ConnectionManager` is a cheap handle; every call works on a clone.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

fn cache_error(op: &'static str, key: &str, e: RedisError) -> DomainError {
    error!(key, "Redis {} failed: {}", op, e);
    DomainError::CacheError(e.to_string())
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut connection = self.connection.clone();
        connection
            .get::<_, Option<String>>(key)
            .await
            .map_err(|e| cache_error("GET", key, e))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), DomainError> {
        let mut connection = self.connection.clone();
        connection
            .set::<_, _, ()>(key, value)
            .await
            .map_err(|e| cache_error("SET", key, e))
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let mut connection = self.connection.clone();
        connection
            .del::<_, ()>(key)
            .await
            .map_err(|e| cache_error("DEL", key, e))
    }
}
