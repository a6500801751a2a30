//! Post Handlers
//!
//! Posts, likes and comments.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{
    CreateCommentRequest, CreatePostRequest, PageQuery, UpdatePostRequest,
};
use crate::application::dto::response::{CommentResponse, LikeResponse, PostResponse};
use crate::application::services::{LikeService, LikeServiceImpl, PostService, PostServiceImpl};
use crate::domain::UserSummary;
use crate::infrastructure::repositories::{
    PgCommentRepository, PgLikeRepository, PgPostRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

fn post_service(state: &AppState) -> impl PostService {
    PostServiceImpl::new(
        Arc::new(PgPostRepository::new(state.db.clone())),
        Arc::new(PgCommentRepository::new(state.db.clone())),
        Arc::new(PgLikeRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        state.notifier(),
        state.publisher.clone(),
        state.snowflake.clone(),
    )
}

fn like_service(state: &AppState) -> impl LikeService {
    LikeServiceImpl::new(
        Arc::new(PgLikeRepository::new(state.db.clone())),
        Arc::new(PgPostRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        state.notifier(),
    )
}

/// Feed of all posts, newest first
pub async fn feed(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let posts = post_service(&state).feed(auth.user_id, page).await?;
    Ok(Json(posts))
}

/// Create a post
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    validate(&body)?;

    let post = post_service(&state).create(auth.user_id, body).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Get a single post
pub async fn get_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostResponse>, AppError> {
    let post = post_service(&state).get(auth.user_id, post_id).await?;
    Ok(Json(post))
}

/// Update a post (author only)
pub async fn update_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(post_id): Path<i64>,
    Json(body): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    validate(&body)?;

    let post = post_service(&state)
        .update(auth.user_id, post_id, body)
        .await?;
    Ok(Json(post))
}

/// Delete a post (author only)
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    post_service(&state).delete(auth.user_id, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Posts by one author
pub async fn user_posts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let posts = post_service(&state)
        .by_user(auth.user_id, user_id, page)
        .await?;
    Ok(Json(posts))
}

/// Like or unlike a post
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(post_id): Path<i64>,
) -> Result<Json<LikeResponse>, AppError> {
    let result = like_service(&state).toggle(auth.user_id, post_id).await?;
    Ok(Json(result))
}

/// Like state of a post for the caller
pub async fn like_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(post_id): Path<i64>,
) -> Result<Json<LikeResponse>, AppError> {
    let result = like_service(&state).status(auth.user_id, post_id).await?;
    Ok(Json(result))
}

/// Users who liked a post
pub async fn likers(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = like_service(&state).likers(post_id).await?;
    Ok(Json(users))
}

/// Comments of a post, oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let comments = post_service(&state).comments(post_id).await?;
    Ok(Json(comments))
}

/// Comment on a post
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(post_id): Path<i64>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    validate(&body)?;

    let comment = post_service(&state)
        .add_comment(auth.user_id, post_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Delete a comment (author only)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(comment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    post_service(&state)
        .delete_comment(auth.user_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
