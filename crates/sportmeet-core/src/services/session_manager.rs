// ============================================================================
// Sportmeet Core - Session Manager
// File: crates/sportmeet-core/src/services/session_manager.rs
// ============================================================================
//! Issues, validates, and rotates cookie sessions.
//!
//! An absent, malformed, forged, unknown, or expired cookie is an ordinary
//! `None`, never an error. Errors are reserved for store failures.

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use sportmeet_security::{SessionCookie, TokenGenerator};
use sportmeet_shared::config::SessionSettings;
use sportmeet_shared::EntityId;
use tracing::{debug, error, info};

use crate::domain::{NewSession, Session};
use crate::error::DomainError;
use crate::repositories::SessionRepository;

pub struct SessionManager {
    sessions: Arc<dyn SessionRepository>,
    tokens: TokenGenerator,
    lifetime: Months,
}

impl SessionManager {
    pub fn new(sessions: Arc<dyn SessionRepository>, tokens: TokenGenerator, lifetime: Months) -> Self {
        Self { sessions, tokens, lifetime }
    }

    pub fn from_settings(
        sessions: Arc<dyn SessionRepository>,
        settings: &SessionSettings,
    ) -> Result<Self, DomainError> {
        let tokens = TokenGenerator::new(&settings.secret, &settings.characters, settings.token_length)?;
        Ok(Self::new(sessions, tokens, Months::new(settings.lifetime_months)))
    }

    /// Mint a fresh session for `user_id` and return the cookie to send back.
    pub async fn start(&self, user_id: EntityId) -> Result<SessionCookie, DomainError> {
        let session = self.create(user_id).await?;
        info!(user_id, session_id = session.session_id, "Session started");
        Ok(session.to_cookie())
    }

    /// Resolve the session referenced by a `Cookie` header, if it is valid.
    pub async fn validate(&self, cookie_header: Option<&str>) -> Result<Option<Session>, DomainError> {
        self.find(cookie_header).await
    }

    /// Rotate the current session: create a replacement for the same user and
    /// delete the old row in one transaction. `None` when there is no valid
    /// session or the rotation did not commit; nothing is mutated then.
    pub async fn restore(&self, cookie_header: Option<&str>) -> Result<Option<SessionCookie>, DomainError> {
        let Some(current) = self.find(cookie_header).await? else {
            return Ok(None);
        };

        let replacement = self.new_session(current.user_id);
        match self.sessions.rotate(current.session_id, replacement).await {
            Ok(session) => {
                info!(
                    user_id = session.user_id,
                    old_session_id = current.session_id,
                    session_id = session.session_id,
                    "Session rotated"
                );
                Ok(Some(session.to_cookie()))
            }
            Err(e) => {
                error!(session_id = current.session_id, "Session rotation failed: {}", e);
                Ok(None)
            }
        }
    }

    /// Delete the given session row.
    pub async fn end(&self, session: &Session) -> Result<(), DomainError> {
        self.sessions.delete(session.session_id).await?;
        info!(user_id = session.user_id, session_id = session.session_id, "Session ended");
        Ok(())
    }

    async fn find(&self, cookie_header: Option<&str>) -> Result<Option<Session>, DomainError> {
        let Some(header) = cookie_header else {
            return Ok(None);
        };

        let cookie = match SessionCookie::parse(header) {
            Ok(cookie) => cookie,
            Err(e) => {
                debug!("Ignoring session cookie: {}", e);
                return Ok(None);
            }
        };

        if !self.tokens.verify(&cookie.token) {
            debug!(session_id = cookie.session_id, "Session token failed checksum");
            return Ok(None);
        }

        let Some(session) = self.sessions.find(cookie.session_id, &cookie.token).await? else {
            debug!(session_id = cookie.session_id, "Session not found");
            return Ok(None);
        };

        if !session.is_valid_at(Utc::now()) {
            debug!(session_id = session.session_id, "Session expired");
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn create(&self, user_id: EntityId) -> Result<Session, DomainError> {
        self.sessions.create(self.new_session(user_id)).await.map_err(|e| {
            error!(user_id, "Failed to create session: {}", e);
            DomainError::SessionCreationFailed
        })
    }

    fn new_session(&self, user_id: EntityId) -> NewSession {
        NewSession {
            user_id,
            token: self.tokens.generate(),
            expires_at: self.expiry_from(Utc::now()),
        }
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_months(self.lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockSessionRepository;
    use async_trait::async_trait;
    use chrono::Duration;
    use parking_lot::Mutex;

    const CHARS: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

    /// Store double with real create/find/delete/rotate semantics.
    #[derive(Default)]
    struct FakeSessions {
        rows: Mutex<Vec<Session>>,
        next_id: Mutex<EntityId>,
    }

    impl FakeSessions {
        fn insert(&self, session: NewSession) -> Session {
            let mut next_id = self.next_id.lock();
            *next_id += 1;
            let row = Session {
                session_id: *next_id,
                token: session.token,
                user_id: session.user_id,
                expires_at: session.expires_at,
            };
            self.rows.lock().push(row.clone());
            row
        }

        fn count(&self) -> usize {
            self.rows.lock().len()
        }
    }

    #[async_trait]
    impl SessionRepository for FakeSessions {
        async fn create(&self, session: NewSession) -> Result<Session, DomainError> {
            Ok(self.insert(session))
        }

        async fn find(&self, session_id: EntityId, token: &str) -> Result<Option<Session>, DomainError> {
            Ok(self
                .rows
                .lock()
                .iter()
                .find(|s| s.session_id == session_id && s.token == token)
                .cloned())
        }

        async fn delete(&self, session_id: EntityId) -> Result<(), DomainError> {
            self.rows.lock().retain(|s| s.session_id != session_id);
            Ok(())
        }

        async fn rotate(&self, old_session_id: EntityId, replacement: NewSession) -> Result<Session, DomainError> {
            if !self.rows.lock().iter().any(|s| s.session_id == old_session_id) {
                return Err(DomainError::SessionNotFound);
            }
            let created = self.insert(replacement);
            self.rows.lock().retain(|s| s.session_id != old_session_id);
            Ok(created)
        }
    }

    fn tokens() -> TokenGenerator {
        TokenGenerator::new("test-secret", CHARS, 32).unwrap()
    }

    fn manager(store: Arc<dyn SessionRepository>) -> SessionManager {
        SessionManager::new(store, tokens(), Months::new(24))
    }

    #[tokio::test]
    async fn test_start_then_validate_resolves_user() {
        let store = Arc::new(FakeSessions::default());
        let manager = manager(store.clone());

        let cookie = manager.start(42).await.unwrap();
        let header = cookie.to_header_value();
        assert!(header.starts_with("sessionId="));
        assert!(header.contains(";token="));
        assert!(header.contains(";expiresAt="));

        let session = manager.validate(Some(&header)).await.unwrap().unwrap();
        assert_eq!(session.user_id, 42);

        let expected = Utc::now().checked_add_months(Months::new(24)).unwrap();
        assert!((session.expires_at - expected).num_seconds().abs() < 5);
    }

    #[tokio::test]
    async fn test_validate_rejects_missing_and_malformed_cookies() {
        let manager = manager(Arc::new(FakeSessions::default()));

        assert!(manager.validate(None).await.unwrap().is_none());
        assert!(manager.validate(Some("")).await.unwrap().is_none());
        assert!(manager.validate(Some("token=abc")).await.unwrap().is_none());
        assert!(manager.validate(Some("sessionId=1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tampered_token_never_validates() {
        let store = Arc::new(FakeSessions::default());
        let manager = manager(store.clone());

        let cookie = manager.start(7).await.unwrap();

        // Well-formed token from the same generator, wrong for this session id.
        let forged = SessionCookie { token: tokens().generate(), ..cookie.clone() };
        assert!(manager.validate(Some(&forged.to_header_value())).await.unwrap().is_none());

        // Garbage token that fails the checksum.
        let garbage = SessionCookie { token: "x".repeat(32), ..cookie };
        assert!(manager.validate(Some(&garbage.to_header_value())).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_ignored_and_kept() {
        let store = Arc::new(FakeSessions::default());
        let manager = manager(store.clone());

        let expired = store.insert(NewSession {
            user_id: 3,
            token: tokens().generate(),
            expires_at: Utc::now() - Duration::minutes(1),
        });
        let header = expired.to_cookie().to_header_value();

        assert!(manager.validate(Some(&header)).await.unwrap().is_none());
        assert!(manager.restore(Some(&header)).await.unwrap().is_none());
        assert_eq!(store.count(), 1, "expired row stays, no replacement created");
    }

    #[tokio::test]
    async fn test_restore_rotates_exactly_once() {
        let store = Arc::new(FakeSessions::default());
        let manager = manager(store.clone());

        let original = manager.start(42).await.unwrap().to_header_value();
        assert!(manager.validate(Some(&original)).await.unwrap().is_some());

        let rotated = manager.restore(Some(&original)).await.unwrap().unwrap();
        assert_eq!(store.count(), 1);

        let session = manager.validate(Some(&rotated.to_header_value())).await.unwrap().unwrap();
        assert_eq!(session.user_id, 42);

        assert!(manager.restore(Some(&original)).await.unwrap().is_none());
        assert!(manager.validate(Some(&original)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_start_maps_store_failure_to_generic_error() {
        let mut store = MockSessionRepository::new();
        store
            .expect_create()
            .returning(|_| Err(DomainError::DatabaseError("connection reset".to_string())));

        let manager = manager(Arc::new(store));
        assert!(matches!(manager.start(1).await, Err(DomainError::SessionCreationFailed)));
    }

    #[tokio::test]
    async fn test_failed_rotation_reports_no_session() {
        let generator = tokens();
        let token = generator.generate();
        let current = Session {
            session_id: 9,
            token: token.clone(),
            user_id: 5,
            expires_at: Utc::now() + Duration::days(1),
        };

        let mut store = MockSessionRepository::new();
        let found = current.clone();
        store
            .expect_find()
            .withf(move |id, t| *id == 9 && t == token)
            .returning(move |_, _| Ok(Some(found.clone())));
        store
            .expect_rotate()
            .withf(|old, replacement| *old == 9 && replacement.user_id == 5)
            .returning(|_, _| Err(DomainError::SessionNotFound));

        let manager = SessionManager::new(Arc::new(store), generator, Months::new(24));
        let header = current.to_cookie().to_header_value();
        assert!(manager.restore(Some(&header)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_validate_propagates_store_failure() {
        let mut store = MockSessionRepository::new();
        store
            .expect_find()
            .returning(|_, _| Err(DomainError::DatabaseError("timeout".to_string())));

        let manager = manager(Arc::new(store));
        let header = SessionCookie::new(1, tokens().generate(), Utc::now()).to_header_value();
        assert!(matches!(
            manager.validate(Some(&header)).await,
            Err(DomainError::DatabaseError(_))
        ));
    }

    #[tokio::test]
    async fn test_end_deletes_row() {
        let store = Arc::new(FakeSessions::default());
        let manager = manager(store.clone());

        let header = manager.start(11).await.unwrap().to_header_value();
        let session = manager.validate(Some(&header)).await.unwrap().unwrap();
        manager.end(&session).await.unwrap();

        assert_eq!(store.count(), 0);
        assert!(manager.validate(Some(&header)).await.unwrap().is_none());
    }
}
