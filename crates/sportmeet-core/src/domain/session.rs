//! Session entity

use chrono::{DateTime, Utc};
use sportmeet_security::SessionCookie;
use sportmeet_shared::EntityId;

/// A persisted session row. Valid while `expires_at` lies in the future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: EntityId,
    pub token: String,
    pub user_id: EntityId,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    pub fn to_cookie(&self) -> SessionCookie {
        SessionCookie::new(self.session_id, self.token.clone(), self.expires_at)
    }
}

/// Insert payload; the store assigns `session_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub user_id: EntityId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let session = Session {
            session_id: 1,
            token: "t".to_string(),
            user_id: 42,
            expires_at: now,
        };
        assert!(!session.is_valid_at(now));
        assert!(session.is_valid_at(now - Duration::seconds(1)));
    }
}
