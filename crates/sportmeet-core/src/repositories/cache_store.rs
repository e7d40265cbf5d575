//! Key-value cache trait (port)

use async_trait::async_trait;

use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    async fn set(&self, key: &str, value: String) -> Result<(), DomainError>;
    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}
