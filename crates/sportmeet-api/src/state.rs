use std::collections::HashSet;
use std::sync::Arc;

use sportmeet_core::repositories::{CacheStore, EventRepository, SessionRepository, UserRepository};
use sportmeet_core::services::{AuthService, EventService, SamplingCache, SessionManager, UserService};
use sportmeet_core::DomainError;
use sportmeet_shared::config::AppConfig;

/// Store adapters chosen by the binary (PostgreSQL/Redis or in-memory).
pub struct Ports {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub events: Arc<dyn EventRepository>,
    pub cache: Arc<dyn CacheStore>,
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub events: Arc<EventService>,
    pub feed: Arc<SamplingCache>,
    pub public_paths: Arc<HashSet<String>>,
}

impl AppState {
    pub fn build(ports: Ports, config: &AppConfig) -> Result<Self, DomainError> {
        let sessions = SessionManager::from_settings(ports.sessions, &config.session)?;
        let feed = SamplingCache::new(
            ports.cache,
            ports.users.clone(),
            ports.events.clone(),
            config.cache.clone(),
        );

        Ok(Self {
            sessions: Arc::new(sessions),
            auth: Arc::new(AuthService::new(ports.users.clone())),
            users: Arc::new(UserService::new(ports.users)),
            events: Arc::new(EventService::new(ports.events)),
            feed: Arc::new(feed),
            public_paths: Arc::new(config.session.public_paths.iter().cloned().collect()),
        })
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.contains(path)
    }
}
