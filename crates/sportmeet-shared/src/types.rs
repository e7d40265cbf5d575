//! Common types

/// Primary key of users, events, and sessions (serial columns).
pub type EntityId = i32;
