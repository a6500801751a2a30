//! Outbound domain events.
//!
//! Realtime push, search indexing and mail delivery are external
//! collaborators. The service hands them events through an
//! [`EventPublisher`]; delivery is fire-and-forget and a failed publish never
//! fails the request that produced it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::entities::{Message, Notification};
use crate::shared::error::AppError;

/// Topic consumed by the external search indexer.
pub const SEARCH_INDEX_TOPIC: &str = "search-index";

/// Topic consumed by the mailer.
pub const MAIL_TOPIC: &str = "mail";

/// Document changes the search index must mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum IndexEvent {
    UpsertUser { id: i64, name: String },
    UpsertPost { id: i64, user_id: i64, content: String },
    RemovePost { id: i64 },
}

/// Emails the mailer should send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "template", rename_all = "snake_case")]
pub enum MailRequest {
    Verification { email: String, name: String, token: String },
    PasswordReset { email: String, token: String },
}

/// Everything the service publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum DomainEvent {
    NotificationCreated {
        recipient_id: i64,
        notification: Notification,
    },
    MessageSent {
        recipient_id: i64,
        message: Message,
    },
    SearchIndex(IndexEvent),
    Mail(MailRequest),
}

impl DomainEvent {
    /// Topic the event is published on, without any deployment prefix.
    pub fn topic(&self) -> String {
        match self {
            DomainEvent::NotificationCreated { recipient_id, .. } => {
                format!("notifications/{}", recipient_id)
            }
            DomainEvent::MessageSent { recipient_id, .. } => format!("chat/{}", recipient_id),
            DomainEvent::SearchIndex(_) => SEARCH_INDEX_TOPIC.to_string(),
            DomainEvent::Mail(_) => MAIL_TOPIC.to_string(),
        }
    }

    /// Short label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::NotificationCreated { .. } => "notification_created",
            DomainEvent::MessageSent { .. } => "message_sent",
            DomainEvent::SearchIndex(_) => "search_index",
            DomainEvent::Mail(_) => "mail",
        }
    }
}

/// Pub/sub bridge to external collaborators.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: DomainEvent) -> Result<(), AppError>;
}

/// Publish and swallow failures after logging them.
pub async fn publish_best_effort(publisher: &dyn EventPublisher, event: DomainEvent) {
    let name = event.name();
    if let Err(e) = publisher.publish(event).await {
        tracing::warn!(event = name, error = %e, "Event publish failed");
    }
}

/// Publisher that drops every event. Used when no broker is configured.
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, event: DomainEvent) -> Result<(), AppError> {
        tracing::trace!(event = event.name(), "Dropping event, no broker configured");
        Ok(())
    }
}
