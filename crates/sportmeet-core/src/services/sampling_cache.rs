// ============================================================================
// Sportmeet Core - Sampling Cache
// File: crates/sportmeet-core/src/services/sampling_cache.rs
// ============================================================================
//! Randomized discovery feeds served from pre-warmed cache batches.
//!
//! Warm-up slices each source collection into fixed-size batches stored under
//! `"{collection}/{index}"` and records the batch count under
//! `"{collection}/count"`. Clients send back the indices they have already
//! seen; the server keeps no cursor.

use std::sync::Arc;
use std::time::Instant;

use futures::future::{join_all, try_join};
use rand::seq::IndexedRandom;
use serde::{de::DeserializeOwned, Serialize};
use sportmeet_shared::config::CacheSettings;
use sportmeet_shared::EntityId;
use tracing::{debug, error, info, warn};

use crate::domain::{Event, UserProfile};
use crate::error::DomainError;
use crate::repositories::{CacheStore, EventRepository, UserRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Events,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Events => "events",
        }
    }

    pub fn batch_key(&self, index: usize) -> String {
        format!("{}/{}", self.as_str(), index)
    }

    pub fn count_key(&self) -> String {
        format!("{}/count", self.as_str())
    }
}

/// One page of a discovery feed. `batch_index == None` means exhausted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomBatch<T> {
    pub items: Vec<T>,
    pub batch_index: Option<usize>,
}

impl<T> RandomBatch<T> {
    pub fn exhausted() -> Self {
        Self { items: Vec::new(), batch_index: None }
    }

    pub fn is_exhausted(&self) -> bool {
        self.batch_index.is_none()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WarmUpReport {
    pub users_batches: usize,
    pub events_batches: usize,
    pub failed_writes: usize,
}

pub struct SamplingCache {
    cache: Arc<dyn CacheStore>,
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventRepository>,
    settings: CacheSettings,
}

impl SamplingCache {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        settings: CacheSettings,
    ) -> Self {
        Self { cache, users, events, settings }
    }

    /// Rebuild every batch from the source tables. A failed source read
    /// aborts before anything is written; failed batch writes are counted
    /// and skipped.
    pub async fn warm_up(&self) -> Result<WarmUpReport, DomainError> {
        let started = Instant::now();

        let (users, events) = match try_join(
            self.users.find_many(self.settings.users_limit),
            self.events.find_public(self.settings.events_limit),
        )
        .await
        {
            Ok(sources) => sources,
            Err(e) => {
                error!("Cache warm-up aborted, source read failed: {}", e);
                return Err(e);
            }
        };

        let profiles: Vec<UserProfile> = users.iter().map(UserProfile::from).collect();

        let (users_batches, users_failed) = self
            .store_batches(Collection::Users, &profiles, self.settings.users_batch_length)
            .await?;
        let (events_batches, events_failed) = self
            .store_batches(Collection::Events, &events, self.settings.events_batch_length)
            .await?;

        let report = WarmUpReport {
            users_batches,
            events_batches,
            failed_writes: users_failed + events_failed,
        };

        info!(
            users_batches,
            events_batches,
            failed_writes = report.failed_writes,
            "Cache successfully initialized: {} ms",
            started.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Pick a batch uniformly among the indices not in `excluded`.
    pub async fn random_batch<T: DeserializeOwned>(
        &self,
        collection: Collection,
        excluded: &[usize],
    ) -> Result<RandomBatch<T>, DomainError> {
        let universe = self.batch_count(collection).await?;
        let Some(index) = pick_index(universe, excluded) else {
            debug!(collection = collection.as_str(), universe, "Discovery feed exhausted");
            return Ok(RandomBatch::exhausted());
        };

        let items = match self.cache.get(&collection.batch_key(index)).await? {
            Some(payload) => serde_json::from_str(&payload).unwrap_or_else(|e| {
                warn!(collection = collection.as_str(), index, "Unreadable cache batch: {}", e);
                Vec::new()
            }),
            // Warm-up raced us; an absent batch reads as empty.
            None => Vec::new(),
        };

        Ok(RandomBatch { items, batch_index: Some(index) })
    }

    pub async fn random_users(&self, excluded: &[usize]) -> Result<RandomBatch<UserProfile>, DomainError> {
        self.random_batch(Collection::Users, excluded).await
    }

    pub async fn random_events(&self, excluded: &[usize]) -> Result<RandomBatch<Event>, DomainError> {
        self.random_batch(Collection::Events, excluded).await
    }

    pub async fn is_online(&self, user_id: EntityId) -> Result<bool, DomainError> {
        Ok(self.cache.get(&presence_key(user_id)).await?.is_some())
    }

    pub async fn set_online(&self, user_id: EntityId, online: bool) -> Result<(), DomainError> {
        let key = presence_key(user_id);
        if online {
            self.cache.set(&key, "1".to_string()).await
        } else {
            self.cache.delete(&key).await
        }
    }

    /// Current sampling universe size for `collection`; 0 before any warm-up.
    pub async fn batch_count(&self, collection: Collection) -> Result<usize, DomainError> {
        let Some(raw) = self.cache.get(&collection.count_key()).await? else {
            return Ok(0);
        };
        Ok(raw.trim().parse().unwrap_or_else(|_| {
            warn!(collection = collection.as_str(), value = %raw, "Unreadable batch count");
            0
        }))
    }

    /// Returns (batches written, failed writes).
    async fn store_batches<T: Serialize>(
        &self,
        collection: Collection,
        items: &[T],
        batch_length: usize,
    ) -> Result<(usize, usize), DomainError> {
        let previous = match self.batch_count(collection).await {
            Ok(count) => count,
            Err(e) => {
                warn!(collection = collection.as_str(), "Could not read previous batch count: {}", e);
                0
            }
        };

        let payloads = items
            .chunks(batch_length.max(1))
            .map(|chunk| serde_json::to_string(chunk))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::InternalError(format!("Failed to serialize batch: {}", e)))?;
        let count = payloads.len();

        let writes = payloads.into_iter().enumerate().map(|(index, payload)| async move {
            let result = self.cache.set(&collection.batch_key(index), payload).await;
            (index, result)
        });

        let mut failed = 0;
        for (index, result) in join_all(writes).await {
            if let Err(e) = result {
                warn!(collection = collection.as_str(), index, "Cache batch write failed: {}", e);
                failed += 1;
            }
        }

        if let Err(e) = self.cache.set(&collection.count_key(), count.to_string()).await {
            warn!(collection = collection.as_str(), "Cache batch count write failed: {}", e);
            failed += 1;
        }

        // Batches from a larger earlier warm-up fall outside the new range.
        for index in count..previous {
            if let Err(e) = self.cache.delete(&collection.batch_key(index)).await {
                warn!(collection = collection.as_str(), index, "Stale cache batch delete failed: {}", e);
            }
        }

        Ok((count, failed))
    }
}

fn presence_key(user_id: EntityId) -> String {
    format!("onlineUsers/{}", user_id)
}

fn pick_index(universe: usize, excluded: &[usize]) -> Option<usize> {
    let eligible: Vec<usize> = (0..universe).filter(|i| !excluded.contains(i)).collect();
    eligible.choose(&mut rand::rng()).copied()
}
