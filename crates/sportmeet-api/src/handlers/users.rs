use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use sportmeet_core::domain::{UpdateUser, UserProfile};
use sportmeet_core::services::RandomBatch;
use sportmeet_shared::EntityId;
use validator::Validate;

use crate::dto::{DeleteUserQuery, FeedQuery, UpdatePasswordRequest};
use crate::error::ApiError;
use crate::middleware::RequestContext;
use crate::response::MessageResponse;
use crate::state::AppState;

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = state.users.find_one(id).await?;
    Ok(Json(user.profile()))
}

/// DELETE /users?id=&password=
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<DeleteUserQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.delete(ctx.user_id(), query.id, &query.password).await?;
    Ok(MessageResponse::new("User is deleted"))
}

/// PATCH /users
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<UpdateUser>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.update_profile(ctx.user_id(), body).await?;
    Ok(MessageResponse::new("User is updated"))
}

/// PATCH /users/updatePassword
pub async fn update_password(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    body.validate()?;
    state
        .users
        .update_password(ctx.user_id(), body.id, &body.old_password, &body.new_password)
        .await?;
    Ok(MessageResponse::new("Password is updated"))
}

/// GET /users/random?except=0,3
pub async fn random_users(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<RandomBatch<UserProfile>>, ApiError> {
    let excluded = query.excluded()?;
    Ok(Json(state.feed.random_users(&excluded).await?))
}
