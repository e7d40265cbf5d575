// ============================================================================
// Sportmeet API - Auth Handlers
// File: crates/sportmeet-api/src/handlers/auth.rs
// ============================================================================

use axum::{extract::State, http::HeaderMap, Extension, Json};
use sportmeet_core::domain::{RegisterUser, UserProfile};
use tracing::info;
use validator::Validate;

use crate::dto::LoginRequest;
use crate::error::ApiError;
use crate::middleware::session_gate::{cookie_header, RequestContext};
use crate::response::{MessageResponse, WithSession};
use crate::state::AppState;

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<WithSession<Json<UserProfile>>, ApiError> {
    body.validate()?;

    let user = state
        .auth
        .login(&body.email, &body.password, body.expo_push_token.as_deref())
        .await?;
    let cookie = state.sessions.start(user.id).await?;

    Ok(WithSession::new(cookie, Json(user.profile())))
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterUser>,
) -> Result<WithSession<Json<UserProfile>>, ApiError> {
    let user = state.auth.register(body).await?;
    let cookie = state.sessions.start(user.id).await?;

    Ok(WithSession::new(cookie, Json(user.profile())))
}

/// GET /auth/restoreSession
///
/// Swaps the current session for a fresh one. The gate has already
/// validated the cookie; a rotation that does not commit is a 401.
pub async fn restore_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<WithSession<Json<MessageResponse>>, ApiError> {
    match state.sessions.restore(cookie_header(&headers).as_deref()).await? {
        Some(cookie) => Ok(WithSession::new(cookie, MessageResponse::new("Session is restored"))),
        None => Err(ApiError::Unauthorized("Failed to restore session".to_string())),
    }
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.sessions.end(&ctx.session).await?;
    info!(user_id = ctx.user_id(), "User logged out");
    Ok(MessageResponse::new("Session is closed"))
}
