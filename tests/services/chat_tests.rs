//! Direct messaging scenarios

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use linkme::application::dto::request::{PageQuery, SendMessageRequest};
use linkme::application::services::{ChatError, ChatService, ChatServiceImpl};
use linkme::config::ChatSettings;
use linkme::domain::{DomainEvent, OfflinePresence, PresenceTracker};
use linkme::shared::error::AppError;

use crate::common::{MemoryStore, World};

/// Presence where a fixed set of users is online
struct FixedPresence(Vec<i64>);

#[async_trait]
impl PresenceTracker for FixedPresence {
    async fn touch(&self, _user_id: i64) -> Result<(), AppError> {
        Ok(())
    }

    async fn online(&self, user_ids: &[i64]) -> Result<Vec<i64>, AppError> {
        Ok(user_ids
            .iter()
            .copied()
            .filter(|id| self.0.contains(id))
            .collect())
    }
}

/// Presence store that is always down
struct BrokenPresence;

#[async_trait]
impl PresenceTracker for BrokenPresence {
    async fn touch(&self, _user_id: i64) -> Result<(), AppError> {
        Err(AppError::Internal("presence down".into()))
    }

    async fn online(&self, _user_ids: &[i64]) -> Result<Vec<i64>, AppError> {
        Err(AppError::Internal("presence down".into()))
    }
}

fn chat(world: &World, presence: Arc<dyn PresenceTracker>) -> ChatServiceImpl<MemoryStore, MemoryStore> {
    ChatServiceImpl::new(
        world.store.clone(),
        world.store.clone(),
        presence,
        world.publisher(),
        world.ids.clone(),
        ChatSettings::default(),
    )
}

fn text(content: &str) -> SendMessageRequest {
    SendMessageRequest {
        content: Some(content.into()),
        sticker: None,
    }
}

fn world() -> World {
    let world = World::new();
    world.store.seed_user(1, "ann");
    world.store.seed_user(2, "bob");
    world.store.seed_user(3, "cat");
    world
}

#[tokio::test]
async fn test_conversation_is_symmetric() {
    let world = world();
    let service = chat(&world, Arc::new(OfflinePresence));

    let from_ann = service.start_conversation(1, 2).await.unwrap();
    let from_bob = service.start_conversation(2, 1).await.unwrap();

    assert_eq!(from_ann.id, from_bob.id);
    assert_eq!(from_ann.participant.name, "bob");
    assert_eq!(from_bob.participant.name, "ann");
    assert_eq!(world.store.conversation_count(), 1);
}

#[tokio::test]
async fn test_conversation_with_self_rejected() {
    let world = world();
    let err = chat(&world, Arc::new(OfflinePresence))
        .start_conversation(1, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::SelfConversation));
}

#[tokio::test]
async fn test_mark_read_only_affects_reader() {
    let world = world();
    let service = chat(&world, Arc::new(OfflinePresence));
    let conversation = service.start_conversation(1, 2).await.unwrap();

    service.send(1, conversation.id, text("hi")).await.unwrap();
    service.send(1, conversation.id, text("there")).await.unwrap();
    service.send(2, conversation.id, text("hey")).await.unwrap();

    assert_eq!(service.unread_total(2).await.unwrap(), 2);
    assert_eq!(service.unread_total(1).await.unwrap(), 1);

    service.mark_read(2, conversation.id).await.unwrap();

    assert_eq!(service.unread_total(2).await.unwrap(), 0);
    assert_eq!(service.unread_total(1).await.unwrap(), 1);
}

#[tokio::test]
async fn test_messages_oldest_first_and_pushed_to_recipient() {
    let world = world();
    let service = chat(&world, Arc::new(OfflinePresence));
    let conversation = service.start_conversation(1, 2).await.unwrap();

    service.send(1, conversation.id, text("one")).await.unwrap();
    service
        .send(
            2,
            conversation.id,
            SendMessageRequest {
                content: None,
                sticker: Some("wave".into()),
            },
        )
        .await
        .unwrap();

    let messages = service
        .messages(1, conversation.id, PageQuery::default())
        .await
        .unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content.as_deref(), Some("one"));
    assert_eq!(messages[1].sticker.as_deref(), Some("wave"));

    let chat_topics: Vec<String> = world
        .publisher
        .events()
        .into_iter()
        .filter(|e| matches!(e, DomainEvent::MessageSent { .. }))
        .map(|e| e.topic())
        .collect();
    assert_eq!(chat_topics, vec!["chat/2".to_string(), "chat/1".to_string()]);
}

#[tokio::test]
async fn test_invalid_messages_rejected() {
    let world = world();
    let service = chat(&world, Arc::new(OfflinePresence));
    let conversation = service.start_conversation(1, 2).await.unwrap();

    let blank = service.send(1, conversation.id, text("   ")).await.unwrap_err();
    assert!(matches!(blank, ChatError::InvalidMessage(_)));

    let both = service
        .send(
            1,
            conversation.id,
            SendMessageRequest {
                content: Some("hi".into()),
                sticker: Some("wave".into()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(both, ChatError::InvalidMessage(_)));

    let sticker = service
        .send(
            1,
            conversation.id,
            SendMessageRequest {
                content: None,
                sticker: Some("unicorn".into()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(sticker, ChatError::UnknownSticker(_)));

    let too_long = "x".repeat(ChatSettings::default().max_message_length + 1);
    let long = service
        .send(1, conversation.id, text(&too_long))
        .await
        .unwrap_err();
    assert!(matches!(long, ChatError::InvalidMessage(_)));

    assert_eq!(service.unread_total(2).await.unwrap(), 0);
}

#[tokio::test]
async fn test_outsider_cannot_read_or_write() {
    let world = world();
    let service = chat(&world, Arc::new(OfflinePresence));
    let conversation = service.start_conversation(1, 2).await.unwrap();

    let read = service
        .messages(3, conversation.id, PageQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(read, ChatError::NotParticipant));

    let write = service.send(3, conversation.id, text("hi")).await.unwrap_err();
    assert!(matches!(AppError::from(write), AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_conversations_sorted_by_activity_with_presence() {
    let world = world();
    let service = chat(&world, Arc::new(FixedPresence(vec![3])));

    let with_bob = service.start_conversation(1, 2).await.unwrap();
    let with_cat = service.start_conversation(1, 3).await.unwrap();
    service.send(2, with_bob.id, text("latest")).await.unwrap();

    let list = service.conversations(1).await.unwrap();
    let ids: Vec<i64> = list.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![with_bob.id, with_cat.id]);

    assert!(!list[0].is_online);
    assert_eq!(list[0].unread_count, 1);
    assert_eq!(
        list[0].last_message.as_ref().and_then(|m| m.content.as_deref()),
        Some("latest")
    );
    assert!(list[1].is_online);
    assert!(list[1].last_message.is_none());
}

#[tokio::test]
async fn test_broken_presence_reports_offline() {
    let world = world();
    let service = chat(&world, Arc::new(BrokenPresence));

    let conversation = service.start_conversation(1, 2).await.unwrap();
    assert!(!conversation.is_online);

    assert!(service.heartbeat(1).await.is_err());
}
