//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{auth_middleware, logging};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(logging::track_metrics))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// All `/api` routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state))
}

/// Routes reachable without a token
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login_check", post(handlers::auth::login))
        .route("/user/register", post(handlers::auth::register))
        .route("/user/verify", post(handlers::auth::verify_email))
        .route("/user/forgot-password", post(handlers::auth::forgot_password))
        .route("/user/reset-password", post(handlers::auth::reset_password))
}

/// Routes requiring a bearer token
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(user_routes())
        .merge(post_routes())
        .merge(notification_routes())
        .merge(chat_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Profile, search and follow graph
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user/profile",
            get(handlers::user::get_profile).put(handlers::user::update_profile),
        )
        .route("/user/followings", get(handlers::user::my_followings))
        .route("/users/search", get(handlers::user::search_users))
        .route("/users/{id}", get(handlers::user::get_user))
        .route("/users/{id}/follow", post(handlers::user::toggle_follow))
        .route("/users/{id}/followers", get(handlers::user::followers))
        .route("/users/{id}/following", get(handlers::user::following))
}

/// Posts, likes and comments
fn post_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            get(handlers::post::feed).post(handlers::post::create_post),
        )
        .route(
            "/posts/{id}",
            get(handlers::post::get_post)
                .put(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        .route("/posts/user/{id}", get(handlers::post::user_posts))
        .route(
            "/posts/{id}/like",
            post(handlers::post::toggle_like).get(handlers::post::like_status),
        )
        .route("/posts/{id}/likes", get(handlers::post::likers))
        .route(
            "/posts/{id}/comments",
            get(handlers::post::list_comments).post(handlers::post::create_comment),
        )
        .route("/comments/{id}", delete(handlers::post::delete_comment))
}

/// Notifications
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/mark-all-read",
            post(handlers::notification::mark_all_read),
        )
}

/// Direct messaging
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/chat/conversations",
            get(handlers::chat::list_conversations).post(handlers::chat::start_conversation),
        )
        .route(
            "/chat/conversations/{id}/messages",
            get(handlers::chat::list_messages).post(handlers::chat::send_message),
        )
        .route(
            "/chat/conversations/{id}/read",
            post(handlers::chat::mark_read),
        )
        .route("/chat/unread-count", get(handlers::chat::unread_count))
        .route("/chat/stickers", get(handlers::chat::stickers))
        .route("/chat/online-status", post(handlers::chat::online_status))
}
