//! Notification Repository Implementation
//!
//! Deduplication relies on the partial unique index over unread rows; an
//! insert that collides with it is silently dropped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Notification, NotificationKind, NotificationRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    recipient_id: i64,
    actor_id: i64,
    post_id: Option<i64>,
    kind: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind = NotificationKind::parse(&row.kind).ok_or_else(|| {
            AppError::Internal(format!("Unknown notification kind: {}", row.kind))
        })?;

        Ok(Self {
            id: row.id,
            recipient_id: row.recipient_id,
            actor_id: row.actor_id,
            post_id: row.post_id,
            kind,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL notification repository implementation.
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create_if_absent(
        &self,
        notification: &Notification,
    ) -> Result<Option<Notification>, AppError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (id, recipient_id, actor_id, post_id, kind, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6)
            ON CONFLICT DO NOTHING
            RETURNING id, recipient_id, actor_id, post_id, kind, is_read, created_at
            "#,
        )
        .bind(notification.id)
        .bind(notification.recipient_id)
        .bind(notification.actor_id)
        .bind(notification.post_id)
        .bind(notification.kind.as_str())
        .bind(notification.created_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Notification::try_from).transpose()
    }

    async fn find_by_recipient(
        &self,
        recipient_id: i64,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, recipient_id, actor_id, post_id, kind, is_read, created_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(recipient_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn unread_count(&self, recipient_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND NOT is_read",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn mark_all_read(&self, recipient_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE recipient_id = $1 AND NOT is_read",
        )
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
