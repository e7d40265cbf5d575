// ============================================================================
// Sportmeet API - Session Gate
// File: crates/sportmeet-api/src/middleware/session_gate.rs
// ============================================================================
//! Runs before every handler. Paths on the public allow-list pass through;
//! everything else needs a valid session cookie, otherwise 401 before any
//! handler logic executes.

use axum::{
    extract::{Request, State},
    http::{header::COOKIE, HeaderMap},
    middleware::Next,
    response::Response,
};
use sportmeet_core::domain::Session;
use sportmeet_shared::EntityId;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Per-request context, present on every non-public route.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub session: Session,
}

impl RequestContext {
    pub fn user_id(&self) -> EntityId {
        self.session.user_id
    }
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request.uri().path().to_string();
    if let Some(session) = validate_or_reject(&state, &path, request.headers()).await? {
        request.extensions_mut().insert(RequestContext { session });
    }
    Ok(next.run(request).await)
}

/// `Ok(None)` for an allow-listed path, `Ok(Some(session))` for an
/// authenticated request, `Unauthorized` otherwise.
pub async fn validate_or_reject(
    state: &AppState,
    path: &str,
    headers: &HeaderMap,
) -> Result<Option<Session>, ApiError> {
    if state.is_public(path) {
        return Ok(None);
    }

    let cookie = cookie_header(headers);
    match state.sessions.validate(cookie.as_deref()).await? {
        Some(session) => Ok(Some(session)),
        None => {
            debug!(path, "Rejected request without a valid session");
            Err(ApiError::unauthorized())
        }
    }
}

/// Every `Cookie` field joined with `"; "`, since HTTP/2 clients may split
/// cookies across several fields. Non-UTF-8 fields are skipped.
pub fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let fields: Vec<&str> = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();

    if fields.is_empty() {
        None
    } else {
        Some(fields.join("; "))
    }
}
