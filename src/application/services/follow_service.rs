//! Follow Service
//!
//! Toggles directed follow edges and lists both sides of the graph.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use super::notification_service::Notifier;
use crate::application::dto::response::FollowToggleResponse;
use crate::domain::{
    FollowRepository, NotificationKind, NotificationRepository, UserRepository, UserSummary,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Follow service trait
#[async_trait]
pub trait FollowService: Send + Sync {
    /// Follow `target_id` if not yet followed, unfollow otherwise
    async fn toggle(&self, actor_id: i64, target_id: i64)
        -> Result<FollowToggleResponse, FollowError>;

    /// Users following `user_id`
    async fn followers(&self, user_id: i64) -> Result<Vec<UserSummary>, FollowError>;

    /// Users `user_id` follows
    async fn following(&self, user_id: i64) -> Result<Vec<UserSummary>, FollowError>;
}

/// Follow service errors
#[derive(Debug, thiserror::Error)]
pub enum FollowError {
    #[error("You cannot follow yourself")]
    SelfFollow,

    #[error("User not found")]
    UserNotFound,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<FollowError> for AppError {
    fn from(err: FollowError) -> Self {
        match err {
            FollowError::SelfFollow => AppError::validation(err.to_string()),
            FollowError::UserNotFound => AppError::NotFound(err.to_string()),
            FollowError::Store(e) => e,
        }
    }
}

/// FollowService implementation
pub struct FollowServiceImpl<F, U, N>
where
    F: FollowRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    follow_repo: Arc<F>,
    user_repo: Arc<U>,
    notifier: Notifier<N>,
}

impl<F, U, N> FollowServiceImpl<F, U, N>
where
    F: FollowRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    pub fn new(follow_repo: Arc<F>, user_repo: Arc<U>, notifier: Notifier<N>) -> Self {
        Self {
            follow_repo,
            user_repo,
            notifier,
        }
    }

    async fn ensure_user(&self, user_id: i64) -> Result<(), FollowError> {
        match self.user_repo.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(FollowError::UserNotFound),
        }
    }

    async fn summaries_in_order(&self, ids: Vec<i64>) -> Result<Vec<UserSummary>, FollowError> {
        let summaries = super::load_summaries(self.user_repo.as_ref(), &ids).await?;
        Ok(ids
            .into_iter()
            .filter_map(|id| summaries.get(&id).cloned())
            .collect())
    }
}

#[async_trait]
impl<F, U, N> FollowService for FollowServiceImpl<F, U, N>
where
    F: FollowRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationRepository + 'static,
{
    #[instrument(skip(self))]
    async fn toggle(
        &self,
        actor_id: i64,
        target_id: i64,
    ) -> Result<FollowToggleResponse, FollowError> {
        if actor_id == target_id {
            return Err(FollowError::SelfFollow);
        }

        self.ensure_user(target_id).await?;

        let following = self.follow_repo.toggle(actor_id, target_id).await?;
        metrics::record_social_action(
            "follow_toggle",
            if following { "followed" } else { "unfollowed" },
        );

        if following {
            self.notifier
                .notify(actor_id, target_id, NotificationKind::Follow, None)
                .await?;
        }

        let target_counts = self.follow_repo.counts(target_id).await?;
        let actor_counts = self.follow_repo.counts(actor_id).await?;

        Ok(FollowToggleResponse {
            following,
            followers_count: target_counts.followers,
            following_count: actor_counts.following,
        })
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<UserSummary>, FollowError> {
        self.ensure_user(user_id).await?;
        let ids = self.follow_repo.followers(user_id).await?;
        self.summaries_in_order(ids).await
    }

    async fn following(&self, user_id: i64) -> Result<Vec<UserSummary>, FollowError> {
        self.ensure_user(user_id).await?;
        let ids = self.follow_repo.following(user_id).await?;
        self.summaries_in_order(ids).await
    }
}
