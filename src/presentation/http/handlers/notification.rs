//! Notification Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};

use crate::application::dto::response::{
    CountResponse, MarkAllReadResponse, NotificationResponse,
};
use crate::application::services::{NotificationService, NotificationServiceImpl};
use crate::infrastructure::repositories::{PgNotificationRepository, PgUserRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn notification_service(state: &AppState) -> impl NotificationService {
    NotificationServiceImpl::new(
        Arc::new(PgNotificationRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
    )
}

/// The caller's notifications, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let notifications = notification_service(&state).list(auth.user_id).await?;
    Ok(Json(notifications))
}

/// Number of unread notifications
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<CountResponse>, AppError> {
    let count = notification_service(&state)
        .unread_count(auth.user_id)
        .await?;
    Ok(Json(CountResponse { count }))
}

/// Mark every notification as read
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let updated = notification_service(&state)
        .mark_all_read(auth.user_id)
        .await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
