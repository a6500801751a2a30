//! Chat Service
//!
//! One conversation per unordered pair of users, per-participant unread
//! counters, sticker messages and online presence.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use super::{load_summaries, summary_or_placeholder};
use crate::application::dto::request::{PageQuery, SendMessageRequest};
use crate::application::dto::response::{ChatMessageResponse, ConversationResponse};
use crate::config::ChatSettings;
use crate::domain::events::publish_best_effort;
use crate::domain::{
    Conversation, ConversationPair, ConversationRepository, DomainEvent, EventPublisher, Message,
    MessageBody, PresenceTracker, UserRepository,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

const DEFAULT_MESSAGE_PAGE: i64 = 50;
const MAX_MESSAGE_PAGE: i64 = 100;

/// Chat service trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Find or create the conversation between the caller and `other_id`
    async fn start_conversation(
        &self,
        user_id: i64,
        other_id: i64,
    ) -> Result<ConversationResponse, ChatError>;

    /// The caller's conversations, most recent activity first
    async fn conversations(&self, user_id: i64) -> Result<Vec<ConversationResponse>, ChatError>;

    /// Messages of a conversation, oldest first
    async fn messages(
        &self,
        user_id: i64,
        conversation_id: i64,
        page: PageQuery,
    ) -> Result<Vec<ChatMessageResponse>, ChatError>;

    async fn send(
        &self,
        user_id: i64,
        conversation_id: i64,
        req: SendMessageRequest,
    ) -> Result<ChatMessageResponse, ChatError>;

    /// Zero the caller's unread counter
    async fn mark_read(&self, user_id: i64, conversation_id: i64) -> Result<(), ChatError>;

    /// Sum of the caller's unread counters
    async fn unread_total(&self, user_id: i64) -> Result<i64, ChatError>;

    fn stickers(&self) -> Vec<String>;

    /// Presence heartbeat
    async fn heartbeat(&self, user_id: i64) -> Result<(), ChatError>;
}

/// Chat service errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("You cannot start a conversation with yourself")]
    SelfConversation,

    #[error("User not found")]
    UserNotFound,

    #[error("Conversation not found")]
    ConversationNotFound,

    #[error("You are not a participant of this conversation")]
    NotParticipant,

    #[error("{0}")]
    InvalidMessage(String),

    #[error("Unknown sticker: {0}")]
    UnknownSticker(String),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::SelfConversation
            | ChatError::InvalidMessage(_)
            | ChatError::UnknownSticker(_) => AppError::validation(err.to_string()),
            ChatError::UserNotFound | ChatError::ConversationNotFound => {
                AppError::NotFound(err.to_string())
            }
            ChatError::NotParticipant => AppError::Forbidden(err.to_string()),
            ChatError::Store(e) => e,
        }
    }
}

/// ChatService implementation
pub struct ChatServiceImpl<C, U>
where
    C: ConversationRepository,
    U: UserRepository,
{
    conversation_repo: Arc<C>,
    user_repo: Arc<U>,
    presence: Arc<dyn PresenceTracker>,
    publisher: Arc<dyn EventPublisher>,
    id_generator: Arc<SnowflakeGenerator>,
    settings: ChatSettings,
}

impl<C, U> ChatServiceImpl<C, U>
where
    C: ConversationRepository,
    U: UserRepository,
{
    pub fn new(
        conversation_repo: Arc<C>,
        user_repo: Arc<U>,
        presence: Arc<dyn PresenceTracker>,
        publisher: Arc<dyn EventPublisher>,
        id_generator: Arc<SnowflakeGenerator>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            conversation_repo,
            user_repo,
            presence,
            publisher,
            id_generator,
            settings,
        }
    }

    /// Load a conversation the caller takes part in.
    async fn participant_conversation(
        &self,
        user_id: i64,
        conversation_id: i64,
    ) -> Result<Conversation, ChatError> {
        let conversation = self
            .conversation_repo
            .find_by_id(conversation_id)
            .await?
            .ok_or(ChatError::ConversationNotFound)?;

        if !conversation.includes(user_id) {
            return Err(ChatError::NotParticipant);
        }

        Ok(conversation)
    }

    /// Presence is advisory: a broken presence store reports everyone offline.
    async fn online_set(&self, user_ids: &[i64]) -> HashSet<i64> {
        match self.presence.online(user_ids).await {
            Ok(online) => online.into_iter().collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Presence lookup failed");
                HashSet::new()
            }
        }
    }

    fn message_body(&self, req: SendMessageRequest) -> Result<MessageBody, ChatError> {
        match (req.content, req.sticker) {
            (Some(content), None) => {
                if content.trim().is_empty() {
                    return Err(ChatError::InvalidMessage("Message cannot be empty".into()));
                }
                if content.chars().count() > self.settings.max_message_length {
                    return Err(ChatError::InvalidMessage(format!(
                        "Message must be at most {} characters",
                        self.settings.max_message_length
                    )));
                }
                Ok(MessageBody::Text(content))
            }
            (None, Some(sticker)) => {
                if !self.settings.stickers.iter().any(|s| *s == sticker) {
                    return Err(ChatError::UnknownSticker(sticker));
                }
                Ok(MessageBody::Sticker(sticker))
            }
            _ => Err(ChatError::InvalidMessage(
                "Provide exactly one of content or sticker".into(),
            )),
        }
    }
}

#[async_trait]
impl<C, U> ChatService for ChatServiceImpl<C, U>
where
    C: ConversationRepository + 'static,
    U: UserRepository + 'static,
{
    #[instrument(skip(self))]
    async fn start_conversation(
        &self,
        user_id: i64,
        other_id: i64,
    ) -> Result<ConversationResponse, ChatError> {
        let pair = ConversationPair::new(user_id, other_id).ok_or(ChatError::SelfConversation)?;

        let other = self
            .user_repo
            .find_by_id(other_id)
            .await?
            .ok_or(ChatError::UserNotFound)?;

        let conversation = self
            .conversation_repo
            .find_or_create(pair, self.id_generator.generate())
            .await?;

        let last_message = self
            .conversation_repo
            .last_messages(&[conversation.id])
            .await?
            .pop();
        let is_online = self.online_set(&[other_id]).await.contains(&other_id);

        Ok(ConversationResponse::new(
            &conversation,
            user_id,
            other.summary(),
            is_online,
            last_message,
        ))
    }

    async fn conversations(&self, user_id: i64) -> Result<Vec<ConversationResponse>, ChatError> {
        let conversations = self.conversation_repo.find_by_user(user_id).await?;

        let counterpart_ids: Vec<i64> = conversations
            .iter()
            .filter_map(|c| c.counterpart_of(user_id))
            .collect();
        let conversation_ids: Vec<i64> = conversations.iter().map(|c| c.id).collect();

        let participants = load_summaries(self.user_repo.as_ref(), &counterpart_ids).await?;
        let online = self.online_set(&counterpart_ids).await;
        let mut last_messages: HashMap<i64, Message> = if conversation_ids.is_empty() {
            HashMap::new()
        } else {
            self.conversation_repo
                .last_messages(&conversation_ids)
                .await?
                .into_iter()
                .map(|m| (m.conversation_id, m))
                .collect()
        };

        Ok(conversations
            .iter()
            .filter_map(|conversation| {
                let other_id = conversation.counterpart_of(user_id)?;
                Some(ConversationResponse::new(
                    conversation,
                    user_id,
                    summary_or_placeholder(&participants, other_id),
                    online.contains(&other_id),
                    last_messages.remove(&conversation.id),
                ))
            })
            .collect())
    }

    async fn messages(
        &self,
        user_id: i64,
        conversation_id: i64,
        page: PageQuery,
    ) -> Result<Vec<ChatMessageResponse>, ChatError> {
        self.participant_conversation(user_id, conversation_id)
            .await?;

        let messages = self
            .conversation_repo
            .find_messages(
                conversation_id,
                page.before,
                page.limit_or(DEFAULT_MESSAGE_PAGE, MAX_MESSAGE_PAGE),
            )
            .await?;

        Ok(messages.into_iter().map(ChatMessageResponse::from).collect())
    }

    #[instrument(skip(self, req))]
    async fn send(
        &self,
        user_id: i64,
        conversation_id: i64,
        req: SendMessageRequest,
    ) -> Result<ChatMessageResponse, ChatError> {
        let conversation = self
            .participant_conversation(user_id, conversation_id)
            .await?;
        let recipient_id = conversation
            .counterpart_of(user_id)
            .ok_or(ChatError::NotParticipant)?;

        let body = self.message_body(req)?;
        let message = Message::new(self.id_generator.generate(), conversation.id, user_id, body);
        let message = self
            .conversation_repo
            .append_message(&message, recipient_id)
            .await?;

        metrics::record_social_action("message", "sent");
        publish_best_effort(
            self.publisher.as_ref(),
            DomainEvent::MessageSent {
                recipient_id,
                message: message.clone(),
            },
        )
        .await;

        Ok(ChatMessageResponse::from(message))
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, user_id: i64, conversation_id: i64) -> Result<(), ChatError> {
        self.participant_conversation(user_id, conversation_id)
            .await?;
        self.conversation_repo
            .mark_read(conversation_id, user_id)
            .await?;
        Ok(())
    }

    async fn unread_total(&self, user_id: i64) -> Result<i64, ChatError> {
        Ok(self.conversation_repo.total_unread(user_id).await?)
    }

    fn stickers(&self) -> Vec<String> {
        self.settings.stickers.clone()
    }

    async fn heartbeat(&self, user_id: i64) -> Result<(), ChatError> {
        self.presence.touch(user_id).await?;
        Ok(())
    }
}
