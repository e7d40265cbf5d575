//! Application-wide constants

pub const DEFAULT_SESSION_LIFETIME_MONTHS: u32 = 24;
pub const DEFAULT_TOKEN_CHARACTERS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const DEFAULT_TOKEN_LENGTH: usize = 64;
pub const DEFAULT_PUBLIC_PATHS: [&str; 3] = ["/auth/login", "/auth/register", "/test"];

pub const DEFAULT_USERS_WARMUP_LIMIT: i64 = 150;
pub const DEFAULT_USERS_BATCH_LENGTH: usize = 15;
pub const DEFAULT_EVENTS_WARMUP_LIMIT: i64 = 100;
pub const DEFAULT_EVENTS_BATCH_LENGTH: usize = 10;
pub const DEFAULT_CACHE_REFRESH_SECS: u64 = 30 * 60;
