//! Repository and cache traits (ports)

pub mod cache_store;
pub mod event_repository;
pub mod session_repository;
pub mod user_repository;

pub use cache_store::CacheStore;
pub use event_repository::EventRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use cache_store::MockCacheStore;
#[cfg(test)]
pub use event_repository::MockEventRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
