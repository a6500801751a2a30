//! Like Service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use super::notification_service::Notifier;
use crate::application::dto::response::LikeResponse;
use crate::domain::{
    LikeRepository, NotificationKind, NotificationRepository, Post, PostRepository,
    UserRepository, UserSummary,
};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Like service trait
#[async_trait]
pub trait LikeService: Send + Sync {
    /// Like the post if not yet liked, unlike otherwise
    async fn toggle(&self, user_id: i64, post_id: i64) -> Result<LikeResponse, LikeError>;

    /// Like state of the post for `user_id`
    async fn status(&self, user_id: i64, post_id: i64) -> Result<LikeResponse, LikeError>;

    /// Users who liked the post
    async fn likers(&self, post_id: i64) -> Result<Vec<UserSummary>, LikeError>;
}

/// Like service errors
#[derive(Debug, thiserror::Error)]
pub enum LikeError {
    #[error("Post not found")]
    PostNotFound,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<LikeError> for AppError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::PostNotFound => AppError::NotFound(err.to_string()),
            LikeError::Store(e) => e,
        }
    }
}

/// LikeService implementation
pub struct LikeServiceImpl<L, P, U, N>
where
    L: LikeRepository,
    P: PostRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    like_repo: Arc<L>,
    post_repo: Arc<P>,
    user_repo: Arc<U>,
    notifier: Notifier<N>,
}

impl<L, P, U, N> LikeServiceImpl<L, P, U, N>
where
    L: LikeRepository,
    P: PostRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    pub fn new(
        like_repo: Arc<L>,
        post_repo: Arc<P>,
        user_repo: Arc<U>,
        notifier: Notifier<N>,
    ) -> Self {
        Self {
            like_repo,
            post_repo,
            user_repo,
            notifier,
        }
    }

    async fn find_post(&self, post_id: i64) -> Result<Post, LikeError> {
        self.post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(LikeError::PostNotFound)
    }
}

#[async_trait]
impl<L, P, U, N> LikeService for LikeServiceImpl<L, P, U, N>
where
    L: LikeRepository + 'static,
    P: PostRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationRepository + 'static,
{
    #[instrument(skip(self))]
    async fn toggle(&self, user_id: i64, post_id: i64) -> Result<LikeResponse, LikeError> {
        let post = self.find_post(post_id).await?;

        let toggle = self.like_repo.toggle(user_id, post_id).await?;
        metrics::record_social_action(
            "like_toggle",
            if toggle.liked { "liked" } else { "unliked" },
        );

        if toggle.liked {
            self.notifier
                .notify(user_id, post.user_id, NotificationKind::Like, Some(post_id))
                .await?;
        }

        Ok(LikeResponse::from(toggle))
    }

    async fn status(&self, user_id: i64, post_id: i64) -> Result<LikeResponse, LikeError> {
        let post = self.find_post(post_id).await?;
        let liked = self.like_repo.has_liked(user_id, post_id).await?;

        Ok(LikeResponse {
            liked,
            likes_count: post.likes_count,
        })
    }

    async fn likers(&self, post_id: i64) -> Result<Vec<UserSummary>, LikeError> {
        self.find_post(post_id).await?;

        let ids = self.like_repo.likers(post_id).await?;
        let summaries = super::load_summaries(self.user_repo.as_ref(), &ids).await?;

        Ok(ids
            .into_iter()
            .filter_map(|id| summaries.get(&id).cloned())
            .collect())
    }
}
