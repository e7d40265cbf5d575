use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{auth, events, health, presence, users};
use crate::middleware::require_session;
use crate::state::AppState;

/// Every route sits behind the session gate; the allow-list in `AppState`
/// decides which paths skip it.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/restoreSession", get(auth::restore_session))
        .route("/auth/logout", post(auth::logout));

    let user_routes = Router::new()
        .route("/users", delete(users::delete_user).patch(users::update_profile))
        .route("/users/updatePassword", patch(users::update_password))
        .route("/users/random", get(users::random_users))
        .route("/users/online", put(presence::set_online))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/online", get(presence::is_online));

    let event_routes = Router::new()
        .route("/events", post(events::create_event).patch(events::update_event))
        .route("/events/random", get(events::random_events))
        .route("/events/{id}", get(events::get_event).delete(events::delete_event));

    Router::new()
        .route("/test", get(health::health_check))
        .merge(auth_routes)
        .merge(user_routes)
        .merge(event_routes)
        .layer(middleware::from_fn_with_state(state.clone(), require_session))
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
