//! Session cookie wire format
//!
//! `sessionId=<integer>;token=<string>;expiresAt=<ISO-8601>`. The cookie is
//! plain text; its only integrity guarantee is the token checksum plus the
//! exact `(sessionId, token)` store lookup.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

const SESSION_ID_KEY: &str = "sessionId";
const TOKEN_KEY: &str = "token";
const EXPIRES_AT_KEY: &str = "expiresAt";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CookieError {
    #[error("Cookie has no sessionId")]
    MissingSessionId,
    #[error("Cookie sessionId is not an integer: {0}")]
    InvalidSessionId(String),
    #[error("Cookie has no token")]
    MissingToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub session_id: i32,
    pub token: String,
    /// Carried verbatim; never trusted for expiry decisions.
    pub expires_at: Option<String>,
}

impl SessionCookie {
    pub fn new(session_id: i32, token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            session_id,
            token: token.into(),
            expires_at: Some(expires_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }

    /// Parse a `Cookie` header. Unknown pairs (other cookies the browser
    /// sends along) are ignored.
    pub fn parse(header: &str) -> Result<Self, CookieError> {
        let mut session_id = None;
        let mut token = None;
        let mut expires_at = None;

        for pair in header.split(';') {
            let Some((key, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                SESSION_ID_KEY if !value.is_empty() => session_id = Some(value),
                TOKEN_KEY if !value.is_empty() => token = Some(value),
                EXPIRES_AT_KEY if !value.is_empty() => expires_at = Some(value),
                _ => {}
            }
        }

        let session_id = session_id.ok_or(CookieError::MissingSessionId)?;
        let session_id = session_id
            .parse::<i32>()
            .map_err(|_| CookieError::InvalidSessionId(session_id.to_string()))?;
        let token = token.ok_or(CookieError::MissingToken)?;

        Ok(Self {
            session_id,
            token: token.to_string(),
            expires_at: expires_at.map(str::to_string),
        })
    }

    pub fn to_header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={};{}={}", SESSION_ID_KEY, self.session_id, TOKEN_KEY, self.token)?;
        if let Some(expires_at) = &self.expires_at {
            write!(f, ";{}={}", EXPIRES_AT_KEY, expires_at)?;
        }
        Ok(())
    }
}
