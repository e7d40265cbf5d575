use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use sportmeet_core::domain::{CreateEvent, Event, UpdateEvent};
use sportmeet_core::services::RandomBatch;
use sportmeet_shared::EntityId;

use crate::dto::FeedQuery;
use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<EntityId>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.events.find_one(ctx.user_id(), id).await?))
}

/// GET /events/random?except=…
pub async fn random_events(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<RandomBatch<Event>>, ApiError> {
    let excluded = query.excluded()?;
    Ok(Json(state.feed.random_events(&excluded).await?))
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<CreateEvent>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.events.create(ctx.user_id(), body).await?))
}

/// PATCH /events
pub async fn update_event(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<UpdateEvent>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.events.update(ctx.user_id(), body).await?;
    Ok(MessageResponse::new("Updated"))
}

/// DELETE /events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<EntityId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.events.delete(ctx.user_id(), id).await?;
    Ok(MessageResponse::new("Event is deleted"))
}
