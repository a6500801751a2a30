//! User Handlers
//!
//! Own profile, public profiles, search and the follow graph.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};

use crate::application::dto::request::{SearchQuery, UpdateProfileRequest};
use crate::application::dto::response::{
    FollowToggleResponse, ProfileResponse, PublicProfileResponse,
};
use crate::application::services::{
    FollowService, FollowServiceImpl, UserService, UserServiceImpl,
};
use crate::domain::UserSummary;
use crate::infrastructure::repositories::{
    PgFollowRepository, PgPostRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

fn user_service(state: &AppState) -> impl UserService {
    UserServiceImpl::new(
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(PgFollowRepository::new(state.db.clone())),
        Arc::new(PgPostRepository::new(state.db.clone())),
        state.publisher.clone(),
    )
}

fn follow_service(state: &AppState) -> impl FollowService {
    FollowServiceImpl::new(
        Arc::new(PgFollowRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        state.notifier(),
    )
}

/// Get the authenticated user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = user_service(&state).get_profile(auth.user_id).await?;
    Ok(Json(profile))
}

/// Update the authenticated user's profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    validate(&body)?;

    let profile = user_service(&state)
        .update_profile(auth.user_id, body)
        .await?;
    Ok(Json(profile))
}

/// Search users by name
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = user_service(&state).search(&query.q).await?;
    Ok(Json(users))
}

/// Get a user's public profile by id or name
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user): Path<String>,
) -> Result<Json<PublicProfileResponse>, AppError> {
    let profile = user_service(&state)
        .get_public_profile(auth.user_id, &user)
        .await?;
    Ok(Json(profile))
}

/// Follow or unfollow a user
pub async fn toggle_follow(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> Result<Json<FollowToggleResponse>, AppError> {
    let result = follow_service(&state)
        .toggle(auth.user_id, user_id)
        .await?;
    Ok(Json(result))
}

/// Users following a user
pub async fn followers(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = follow_service(&state).followers(user_id).await?;
    Ok(Json(users))
}

/// Users a user follows
pub async fn following(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = follow_service(&state).following(user_id).await?;
    Ok(Json(users))
}

/// Users the authenticated user follows
pub async fn my_followings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = follow_service(&state).following(auth.user_id).await?;
    Ok(Json(users))
}
