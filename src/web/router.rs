//! Router configuration for Web API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    community, create_comment, create_post, delete_comment, delete_post, delete_user, edit_user,
    get_post, list_posts, login, logout, register, reset_user, session_presence, AppState,
};
use super::middleware::{create_cors_layer, inject_state};
use super::ws::events_handler;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // Landing routes; GET answers with session presence for any caller
    let session_routes = Router::new()
        .route("/", get(session_presence))
        .route("/login", get(session_presence).post(login))
        .route("/register", get(session_presence).post(register))
        .route("/logout", get(logout));

    // Forum routes (authentication required)
    let forum_routes = Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/post/:id", get(get_post).post(create_comment))
        .route("/delete_post/:id", get(delete_post))
        .route("/delete-comment/:id", get(delete_comment));

    // User routes; the community overview is public
    let user_routes = Router::new()
        .route("/users", get(community))
        .route("/delete-user/:id", get(delete_user))
        .route("/edit-user/:id", post(edit_user))
        .route("/reset-user/:id", get(reset_user));

    // WebSocket routes
    let ws_routes = Router::new().route("/ws/events", get(events_handler));

    // Clone app_state for the middleware closure
    let state_for_middleware = app_state.clone();

    // Build the main router with middleware
    Router::new()
        .merge(session_routes)
        .merge(forum_routes)
        .merge(user_routes)
        .merge(ws_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = state_for_middleware.clone();
                    inject_state(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
