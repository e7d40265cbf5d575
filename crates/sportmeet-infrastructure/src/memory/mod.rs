//! In-process adapters behind the same ports as PostgreSQL and Redis.
//!
//! Used when `app.storage = "memory"` and by the HTTP tests. All tables live
//! behind one lock, so multi-table operations (rotation, user deletion) are
//! atomic the same way the SQL transactions are.

mod cache;
mod repositories;

pub use cache::MemoryCache;
pub use repositories::{MemoryDatabase, MemoryEventRepository, MemorySessionRepository, MemoryUserRepository};
