//! Cache module (Redis adapter)

pub mod redis_cache;

pub use redis_cache::{init_redis, RedisCache};
