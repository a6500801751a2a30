//! Conversation and direct message entities with their repository trait.
//!
//! A conversation row is keyed by the canonical pair `(user_one_id,
//! user_two_id)` with `user_one_id < user_two_id`, so there is exactly one
//! conversation per unordered pair of users.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Canonical (min, max) ordering of two distinct user ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationPair {
    low: i64,
    high: i64,
}

impl ConversationPair {
    /// Normalize two user ids. Returns `None` when both ids are equal.
    pub fn new(a: i64, b: i64) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn user_one(&self) -> i64 {
        self.low
    }

    pub fn user_two(&self) -> i64 {
        self.high
    }
}

/// A two-party conversation.
///
/// Maps to the `conversations` table:
/// - id: BIGINT PRIMARY KEY
/// - user_one_id / user_two_id: BIGINT, UNIQUE together, CHECK (one < two)
/// - user_one_unread / user_two_unread: INTEGER NOT NULL DEFAULT 0
/// - last_message_at: TIMESTAMPTZ NULL
/// - created_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_one_id: i64,
    pub user_two_id: i64,
    pub user_one_unread: i32,
    pub user_two_unread: i32,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(id: i64, pair: ConversationPair) -> Self {
        Self {
            id,
            user_one_id: pair.user_one(),
            user_two_id: pair.user_two(),
            user_one_unread: 0,
            user_two_unread: 0,
            last_message_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn includes(&self, user_id: i64) -> bool {
        self.user_one_id == user_id || self.user_two_id == user_id
    }

    /// The participant that is not `user_id`.
    pub fn counterpart_of(&self, user_id: i64) -> Option<i64> {
        if user_id == self.user_one_id {
            Some(self.user_two_id)
        } else if user_id == self.user_two_id {
            Some(self.user_one_id)
        } else {
            None
        }
    }

    /// Unread counter belonging to `user_id`.
    pub fn unread_for(&self, user_id: i64) -> Option<i32> {
        if user_id == self.user_one_id {
            Some(self.user_one_unread)
        } else if user_id == self.user_two_id {
            Some(self.user_two_unread)
        } else {
            None
        }
    }

    /// Timestamp the conversation list is ordered by.
    pub fn activity_at(&self) -> DateTime<Utc> {
        self.last_message_at.unwrap_or(self.created_at)
    }
}

/// Message payload: text or a sticker reference, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MessageBody {
    Text(String),
    Sticker(String),
}

impl MessageBody {
    /// Split into the nullable `(content, sticker)` column pair.
    pub fn into_columns(self) -> (Option<String>, Option<String>) {
        match self {
            MessageBody::Text(text) => (Some(text), None),
            MessageBody::Sticker(sticker) => (None, Some(sticker)),
        }
    }

    /// Rebuild from the column pair. Rows violating the CHECK yield `None`.
    pub fn from_columns(content: Option<String>, sticker: Option<String>) -> Option<Self> {
        match (content, sticker) {
            (Some(text), None) => Some(MessageBody::Text(text)),
            (None, Some(sticker)) => Some(MessageBody::Sticker(sticker)),
            _ => None,
        }
    }
}

/// A direct message. Maps to the `messages` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub body: MessageBody,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(id: i64, conversation_id: i64, sender_id: i64, body: MessageBody) -> Self {
        Self {
            id,
            conversation_id,
            sender_id,
            body,
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for conversations and their messages.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Return the conversation for `pair`, creating it with `new_id` if absent.
    async fn find_or_create(
        &self,
        pair: ConversationPair,
        new_id: i64,
    ) -> Result<Conversation, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Conversation>, AppError>;

    /// Conversations that include `user_id`, most recent activity first.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Conversation>, AppError>;

    /// Store a message, set `last_message_at` and increment the recipient's
    /// unread counter in one transaction.
    async fn append_message(
        &self,
        message: &Message,
        recipient_id: i64,
    ) -> Result<Message, AppError>;

    /// Messages of a conversation in creation order, optionally only those
    /// older than `before`. `limit` bounds the newest slice returned.
    async fn find_messages(
        &self,
        conversation_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Message>, AppError>;

    /// Most recent message per conversation for the given ids.
    async fn last_messages(&self, conversation_ids: &[i64]) -> Result<Vec<Message>, AppError>;

    /// Zero the unread counter belonging to `user_id` only.
    async fn mark_read(&self, conversation_id: i64, user_id: i64) -> Result<(), AppError>;

    /// Sum of `user_id`'s unread counters across conversations.
    async fn total_unread(&self, user_id: i64) -> Result<i64, AppError>;
}
