//! # Sportmeet Infrastructure
//! 
//! Database, cache, and in-memory implementations (adapters).

pub mod cache;
pub mod database;
pub mod memory;

pub use cache::{init_redis, RedisCache};
pub use database::{create_pool, ensure_schema, PgEventRepository, PgSessionRepository, PgUserRepository};
pub use memory::{
    MemoryCache, MemoryDatabase, MemoryEventRepository, MemorySessionRepository, MemoryUserRepository,
};
