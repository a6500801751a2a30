//! Conversation Repository Implementation
//!
//! Conversations are stored once per canonical pair. Appending a message
//! updates the conversation's activity timestamp and the recipient's unread
//! counter in the same transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    Conversation, ConversationPair, ConversationRepository, Message, MessageBody,
};
use crate::shared::error::AppError;

const CONVERSATION_COLUMNS: &str =
    "id, user_one_id, user_two_id, user_one_unread, user_two_unread, last_message_at, created_at";

const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, content, sticker, created_at";

#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: i64,
    user_one_id: i64,
    user_two_id: i64,
    user_one_unread: i32,
    user_two_unread: i32,
    last_message_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Self {
            id: row.id,
            user_one_id: row.user_one_id,
            user_two_id: row.user_two_id,
            user_one_unread: row.user_one_unread,
            user_two_unread: row.user_two_unread,
            last_message_at: row.last_message_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    conversation_id: i64,
    sender_id: i64,
    content: Option<String>,
    sticker: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = AppError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let body = MessageBody::from_columns(row.content, row.sticker).ok_or_else(|| {
            AppError::Internal(format!("Message {} has no single body", row.id))
        })?;

        Ok(Self {
            id: row.id,
            conversation_id: row.conversation_id,
            sender_id: row.sender_id,
            body,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL conversation repository implementation.
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    async fn find_or_create(
        &self,
        pair: ConversationPair,
        new_id: i64,
    ) -> Result<Conversation, AppError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, user_one_id, user_two_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_one_id, user_two_id) DO NOTHING
            "#,
        )
        .bind(new_id)
        .bind(pair.user_one())
        .bind(pair.user_two())
        .execute(&self.pool)
        .await?;

        let sql = format!(
            "SELECT {} FROM conversations WHERE user_one_id = $1 AND user_two_id = $2",
            CONVERSATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ConversationRow>(&sql)
            .bind(pair.user_one())
            .bind(pair.user_two())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Conversation>, AppError> {
        let sql = format!(
            "SELECT {} FROM conversations WHERE id = $1",
            CONVERSATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ConversationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Conversation::from))
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Conversation>, AppError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM conversations
            WHERE user_one_id = $1 OR user_two_id = $1
            ORDER BY COALESCE(last_message_at, created_at) DESC, id DESC
            "#,
            CONVERSATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, ConversationRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Conversation::from).collect())
    }

    async fn append_message(
        &self,
        message: &Message,
        recipient_id: i64,
    ) -> Result<Message, AppError> {
        let (content, sticker) = message.body.clone().into_columns();
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, sticker, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MESSAGE_COLUMNS
        );
        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(message.id)
            .bind(message.conversation_id)
            .bind(message.sender_id)
            .bind(content)
            .bind(sticker)
            .bind(message.created_at)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE conversations
            SET last_message_at = $2,
                user_one_unread = user_one_unread + CASE WHEN user_one_id = $3 THEN 1 ELSE 0 END,
                user_two_unread = user_two_unread + CASE WHEN user_two_id = $3 THEN 1 ELSE 0 END
            WHERE id = $1
            "#,
        )
        .bind(message.conversation_id)
        .bind(row.created_at)
        .bind(recipient_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Message::try_from(row)
    }

    async fn find_messages(
        &self,
        conversation_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Message>, AppError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM messages
            WHERE conversation_id = $1 AND ($2::BIGINT IS NULL OR id < $2)
            ORDER BY id DESC
            LIMIT $3
            "#,
            MESSAGE_COLUMNS
        );
        let rows = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(conversation_id)
            .bind(before)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        // Newest slice was fetched; hand it back oldest first.
        rows.into_iter()
            .rev()
            .map(Message::try_from)
            .collect()
    }

    async fn last_messages(&self, conversation_ids: &[i64]) -> Result<Vec<Message>, AppError> {
        if conversation_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT DISTINCT ON (conversation_id) {}
            FROM messages
            WHERE conversation_id = ANY($1)
            ORDER BY conversation_id, id DESC
            "#,
            MESSAGE_COLUMNS
        );
        let rows = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(conversation_ids)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    async fn mark_read(&self, conversation_id: i64, user_id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE conversations
            SET user_one_unread = CASE WHEN user_one_id = $2 THEN 0 ELSE user_one_unread END,
                user_two_unread = CASE WHEN user_two_id = $2 THEN 0 ELSE user_two_unread END
            WHERE id = $1
            "#,
        )
        .bind(conversation_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn total_unread(&self, user_id: i64) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(CASE WHEN user_one_id = $1 THEN user_one_unread
                                     ELSE user_two_unread END), 0)::BIGINT
            FROM conversations
            WHERE user_one_id = $1 OR user_two_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
