use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use sportmeet_core::error::DomainError;
use sportmeet_core::repositories::CacheStore;

#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), DomainError> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCache::new();
        assert!(cache.get("users/0").await.unwrap().is_none());

        cache.set("users/0", "[]".to_string()).await.unwrap();
        assert_eq!(cache.get("users/0").await.unwrap().as_deref(), Some("[]"));

        cache.delete("users/0").await.unwrap();
        cache.delete("users/0").await.unwrap();
        assert!(cache.is_empty());
    }
}
