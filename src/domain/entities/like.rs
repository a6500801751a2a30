//! Like entity and repository trait.
//!
//! Maps to the `likes` table with primary key `(user_id, post_id)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A user's like on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeToggle {
    /// Whether the like exists after the toggle
    pub liked: bool,

    /// The post's cached like count after the toggle
    pub likes_count: i32,
}

/// Repository trait for Like data access operations.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Flip the (user, post) like and adjust `posts.likes_count` in the same
    /// transaction.
    async fn toggle(&self, user_id: i64, post_id: i64) -> Result<LikeToggle, AppError>;

    async fn has_liked(&self, user_id: i64, post_id: i64) -> Result<bool, AppError>;

    /// The subset of `post_ids` liked by `user_id`.
    async fn liked_among(&self, user_id: i64, post_ids: &[i64]) -> Result<Vec<i64>, AppError>;

    /// Ids of users who liked the post, most recent first.
    async fn likers(&self, post_id: i64) -> Result<Vec<i64>, AppError>;
}
