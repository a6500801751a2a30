//! Notification entity and repository trait.
//!
//! Maps to the `notifications` table. A partial unique index over unread rows
//! on `(recipient_id, actor_id, kind, COALESCE(post_id, 0))` guarantees that
//! two identical unread notifications never coexist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// What happened to the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
}

impl NotificationKind {
    /// Convert from database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(Self::Like),
            "comment" => Some(Self::Comment),
            "follow" => Some(Self::Follow),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Follow => "follow",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a notification for deduplication purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationKey {
    pub recipient_id: i64,
    pub actor_id: i64,
    pub kind: NotificationKind,
    pub post_id: Option<i64>,
}

/// A notification delivered to `recipient_id` about `actor_id`'s action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    pub actor_id: i64,
    pub post_id: Option<i64>,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// A new unread notification.
    pub fn new(id: i64, key: NotificationKey) -> Self {
        Self {
            id,
            recipient_id: key.recipient_id,
            actor_id: key.actor_id,
            post_id: key.post_id,
            kind: key.kind,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> NotificationKey {
        NotificationKey {
            recipient_id: self.recipient_id,
            actor_id: self.actor_id,
            kind: self.kind,
            post_id: self.post_id,
        }
    }
}

/// Repository trait for Notification data access operations.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert unless an unread notification with the same key exists.
    ///
    /// Returns the stored row, or `None` when the insert was suppressed.
    async fn create_if_absent(
        &self,
        notification: &Notification,
    ) -> Result<Option<Notification>, AppError>;

    /// Notifications for a recipient, newest first.
    async fn find_by_recipient(
        &self,
        recipient_id: i64,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError>;

    async fn unread_count(&self, recipient_id: i64) -> Result<i64, AppError>;

    /// Flip every unread notification of the recipient to read in one
    /// statement. Returns the number of rows changed.
    async fn mark_all_read(&self, recipient_id: i64) -> Result<u64, AppError>;
}
