//! Notification Service
//!
//! [`Notifier`] is the single entry point other services use to emit
//! notifications; it applies the self-action rule, relies on the repository
//! for unread deduplication, and pushes stored notifications to the
//! recipient's realtime topic. [`NotificationService`] serves the read side.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use super::{load_summaries, summary_or_placeholder};
use crate::application::dto::response::NotificationResponse;
use crate::domain::events::publish_best_effort;
use crate::domain::services::notification_for;
use crate::domain::{
    DomainEvent, EventPublisher, Notification, NotificationKind, NotificationRepository,
    UserRepository,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Default and maximum page size for the notification list
pub const NOTIFICATION_PAGE_SIZE: i64 = 50;

/// Emits deduplicated notifications.
pub struct Notifier<N>
where
    N: NotificationRepository,
{
    notification_repo: Arc<N>,
    publisher: Arc<dyn EventPublisher>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<N> Notifier<N>
where
    N: NotificationRepository,
{
    pub fn new(
        notification_repo: Arc<N>,
        publisher: Arc<dyn EventPublisher>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            notification_repo,
            publisher,
            id_generator,
        }
    }

    /// Notify `recipient_id` that `actor_id` performed `kind`.
    ///
    /// Returns the stored notification, or `None` when it was a self-action
    /// or an identical unread notification already exists.
    #[instrument(skip(self))]
    pub async fn notify(
        &self,
        actor_id: i64,
        recipient_id: i64,
        kind: NotificationKind,
        post_id: Option<i64>,
    ) -> Result<Option<Notification>, AppError> {
        let Some(key) = notification_for(actor_id, recipient_id, kind, post_id) else {
            return Ok(None);
        };

        let candidate = Notification::new(self.id_generator.generate(), key);

        match self.notification_repo.create_if_absent(&candidate).await? {
            Some(stored) => {
                metrics::record_social_action("notification", "created");
                publish_best_effort(
                    self.publisher.as_ref(),
                    DomainEvent::NotificationCreated {
                        recipient_id,
                        notification: stored.clone(),
                    },
                )
                .await;
                Ok(Some(stored))
            }
            None => {
                metrics::record_social_action("notification", "suppressed");
                tracing::debug!("Identical unread notification exists, skipping");
                Ok(None)
            }
        }
    }
}

/// Notification read-side operations
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Newest notifications for the recipient
    async fn list(&self, recipient_id: i64) -> Result<Vec<NotificationResponse>, AppError>;

    /// Number of unread notifications
    async fn unread_count(&self, recipient_id: i64) -> Result<i64, AppError>;

    /// Mark every unread notification as read
    async fn mark_all_read(&self, recipient_id: i64) -> Result<u64, AppError>;
}

/// NotificationService implementation
pub struct NotificationServiceImpl<N, U>
where
    N: NotificationRepository,
    U: UserRepository,
{
    notification_repo: Arc<N>,
    user_repo: Arc<U>,
}

impl<N, U> NotificationServiceImpl<N, U>
where
    N: NotificationRepository,
    U: UserRepository,
{
    pub fn new(notification_repo: Arc<N>, user_repo: Arc<U>) -> Self {
        Self {
            notification_repo,
            user_repo,
        }
    }
}

#[async_trait]
impl<N, U> NotificationService for NotificationServiceImpl<N, U>
where
    N: NotificationRepository + 'static,
    U: UserRepository + 'static,
{
    async fn list(&self, recipient_id: i64) -> Result<Vec<NotificationResponse>, AppError> {
        let notifications = self
            .notification_repo
            .find_by_recipient(recipient_id, NOTIFICATION_PAGE_SIZE)
            .await?;

        let actor_ids: Vec<i64> = notifications.iter().map(|n| n.actor_id).collect();
        let actors = load_summaries(self.user_repo.as_ref(), &actor_ids).await?;

        Ok(notifications
            .into_iter()
            .map(|n| {
                let actor = summary_or_placeholder(&actors, n.actor_id);
                NotificationResponse::new(n, actor)
            })
            .collect())
    }

    async fn unread_count(&self, recipient_id: i64) -> Result<i64, AppError> {
        self.notification_repo.unread_count(recipient_id).await
    }

    #[instrument(skip(self))]
    async fn mark_all_read(&self, recipient_id: i64) -> Result<u64, AppError> {
        let updated = self.notification_repo.mark_all_read(recipient_id).await?;
        tracing::debug!(updated, "Notifications marked as read");
        Ok(updated)
    }
}
