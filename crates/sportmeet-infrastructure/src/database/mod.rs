//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod postgres;
pub mod schema;

pub use connection::create_pool;
pub use postgres::{PgEventRepository, PgSessionRepository, PgUserRepository};
pub use schema::ensure_schema;
