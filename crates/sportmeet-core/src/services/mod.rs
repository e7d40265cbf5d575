//! Domain services (business logic)

pub mod auth_service;
pub mod event_service;
pub mod sampling_cache;
pub mod session_manager;
pub mod user_service;

pub use auth_service::AuthService;
pub use event_service::EventService;
pub use sampling_cache::{Collection, RandomBatch, SamplingCache, WarmUpReport};
pub use session_manager::SessionManager;
pub use user_service::UserService;
