//! Configuration management

use std::collections::HashSet;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::*;
use crate::error::AppError;

/// Length of the HMAC checksum appended to every session token.
pub const TOKEN_CHECKSUM_LENGTH: usize = 8;

/// Characters a token may contain and still round-trip through the session
/// cookie: visible ASCII minus `"`, `,`, `;`, `=` and `\`.
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '"' | ',' | ';' | '=' | '\\')
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub redis: RedisSettings,
    pub session: SessionSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub storage: StorageBackend,
}

/// Where sessions, entities, and cache batches live.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/sportmeet".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub url: String,
    #[serde(default = "default_redis_timeout_ms")]
    pub connection_timeout_ms: u64,
}

fn default_redis_timeout_ms() -> u64 {
    500
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/".to_string(),
            connection_timeout_ms: default_redis_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub secret: String,
    #[serde(default = "default_characters")]
    pub characters: String,
    #[serde(default = "default_token_length")]
    pub token_length: usize,
    #[serde(default = "default_lifetime_months")]
    pub lifetime_months: u32,
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

impl SessionSettings {
    /// Settings with the stock alphabet, length, lifetime, and allow-list.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            characters: default_characters(),
            token_length: default_token_length(),
            lifetime_months: default_lifetime_months(),
            public_paths: default_public_paths(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.secret.trim().is_empty() {
            return Err(AppError::InvalidSetting {
                key: "session.secret",
                reason: "must not be empty".to_string(),
            });
        }

        if let Some(bad) = self.characters.chars().find(|c| !is_token_char(*c)) {
            return Err(AppError::InvalidSetting {
                key: "session.characters",
                reason: format!("{:?} cannot appear in a session cookie", bad),
            });
        }

        let distinct: HashSet<char> = self.characters.chars().collect();
        if distinct.len() < 2 {
            return Err(AppError::InvalidSetting {
                key: "session.characters",
                reason: "needs at least two distinct characters".to_string(),
            });
        }

        if self.token_length <= TOKEN_CHECKSUM_LENGTH {
            return Err(AppError::InvalidSetting {
                key: "session.token_length",
                reason: format!("must be greater than {}", TOKEN_CHECKSUM_LENGTH),
            });
        }

        if self.lifetime_months == 0 {
            return Err(AppError::InvalidSetting {
                key: "session.lifetime_months",
                reason: "must be positive".to_string(),
            });
        }

        Ok(())
    }
}

fn default_characters() -> String {
    DEFAULT_TOKEN_CHARACTERS.to_string()
}

fn default_token_length() -> usize {
    DEFAULT_TOKEN_LENGTH
}

fn default_lifetime_months() -> u32 {
    DEFAULT_SESSION_LIFETIME_MONTHS
}

fn default_public_paths() -> Vec<String> {
    DEFAULT_PUBLIC_PATHS.iter().map(|p| p.to_string()).collect()
}

/// Discovery feed warm-up sizing.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    pub users_limit: i64,
    pub users_batch_length: usize,
    pub events_limit: i64,
    pub events_batch_length: usize,
    /// 0 disables the periodic refresh; warm-up then runs once at startup.
    pub refresh_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            users_limit: DEFAULT_USERS_WARMUP_LIMIT,
            users_batch_length: DEFAULT_USERS_BATCH_LENGTH,
            events_limit: DEFAULT_EVENTS_WARMUP_LIMIT,
            events_batch_length: DEFAULT_EVENTS_BATCH_LENGTH,
            refresh_interval_secs: DEFAULT_CACHE_REFRESH_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub json: bool,
    pub directory: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { json: true, directory: None }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "sportmeet-server")?
            .set_default("app.storage", "postgres")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__").try_parsing(true))
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.session.validate()?;
        if config.cache.users_batch_length == 0 || config.cache.events_batch_length == 0 {
            return Err(AppError::InvalidSetting {
                key: "cache.*_batch_length",
                reason: "must be positive".to_string(),
            });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_session_settings_are_valid() {
        let settings = SessionSettings::with_secret("s3cr3t");
        assert!(settings.validate().is_ok());
        assert_eq!(settings.lifetime_months, 24);
        assert!(settings.public_paths.contains(&"/auth/login".to_string()));
    }

    #[test]
    fn test_rejects_empty_secret() {
        let settings = SessionSettings::with_secret("  ");
        assert!(matches!(
            settings.validate(),
            Err(AppError::InvalidSetting { key: "session.secret", .. })
        ));
    }

    #[test]
    fn test_rejects_short_token_and_tiny_alphabet() {
        let mut settings = SessionSettings::with_secret("s3cr3t");
        settings.token_length = TOKEN_CHECKSUM_LENGTH;
        assert!(settings.validate().is_err());

        let mut settings = SessionSettings::with_secret("s3cr3t");
        settings.characters = "aaaa".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_alphabet_that_breaks_the_cookie() {
        for characters in ["ab;= ", "ab;", "ab=", "ab,", "ab\"", "ab\\", "ab c", "ab\t", "abé"] {
            let mut settings = SessionSettings::with_secret("s3cr3t");
            settings.characters = characters.to_string();
            assert!(
                matches!(
                    settings.validate(),
                    Err(AppError::InvalidSetting { key: "session.characters", .. })
                ),
                "{characters:?} accepted"
            );
        }
        assert!(DEFAULT_TOKEN_CHARACTERS.chars().all(is_token_char));
    }
}
