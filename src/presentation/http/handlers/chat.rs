//! Chat Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::{PageQuery, SendMessageRequest, StartConversationRequest};
use crate::application::dto::response::{
    ChatMessageResponse, ConversationResponse, CountResponse, StickersResponse,
};
use crate::application::services::{ChatService, ChatServiceImpl};
use crate::infrastructure::repositories::{PgConversationRepository, PgUserRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

fn chat_service(state: &AppState) -> impl ChatService {
    ChatServiceImpl::new(
        Arc::new(PgConversationRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        state.presence.clone(),
        state.publisher.clone(),
        state.snowflake.clone(),
        state.settings.chat.clone(),
    )
}

/// The caller's conversations, most recent activity first
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<ConversationResponse>>, AppError> {
    let conversations = chat_service(&state).conversations(auth.user_id).await?;
    Ok(Json(conversations))
}

/// Open the conversation with another user
pub async fn start_conversation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<StartConversationRequest>,
) -> Result<Json<ConversationResponse>, AppError> {
    let conversation = chat_service(&state)
        .start_conversation(auth.user_id, body.user_id)
        .await?;
    Ok(Json(conversation))
}

/// Messages of a conversation, oldest first
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(conversation_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<ChatMessageResponse>>, AppError> {
    let messages = chat_service(&state)
        .messages(auth.user_id, conversation_id, page)
        .await?;
    Ok(Json(messages))
}

/// Send a text or sticker message
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(conversation_id): Path<i64>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessageResponse>), AppError> {
    validate(&body)?;

    let message = chat_service(&state)
        .send(auth.user_id, conversation_id, body)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Mark a conversation read for the caller
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(conversation_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    chat_service(&state)
        .mark_read(auth.user_id, conversation_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Total unread messages
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<CountResponse>, AppError> {
    let count = chat_service(&state).unread_total(auth.user_id).await?;
    Ok(Json(CountResponse { count }))
}

/// Sticker catalogue
pub async fn stickers(State(state): State<AppState>) -> Json<StickersResponse> {
    Json(StickersResponse {
        stickers: chat_service(&state).stickers(),
    })
}

/// Presence heartbeat
pub async fn online_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    chat_service(&state).heartbeat(auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
