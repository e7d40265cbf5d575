//! Online flags, kept in the cache next to the feed batches.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use sportmeet_shared::EntityId;

use crate::dto::OnlineStatus;
use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::state::AppState;

/// GET /users/{id}/online
pub async fn is_online(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<OnlineStatus>, ApiError> {
    let online = state.feed.is_online(id).await?;
    Ok(Json(OnlineStatus { online }))
}

/// PUT /users/online, always for the caller.
pub async fn set_online(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<OnlineStatus>,
) -> Result<Json<OnlineStatus>, ApiError> {
    state.feed.set_online(ctx.user_id(), body.online).await?;
    Ok(Json(body))
}
