//! Comment entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A comment on a post. Maps to the `comments` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(id: i64, post_id: i64, user_id: i64, content: String) -> Self {
        Self {
            id,
            post_id,
            user_id,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for Comment data access operations.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert the comment and bump the post's `comments_count` atomically.
    async fn create(&self, comment: &Comment) -> Result<Comment, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, AppError>;

    /// Delete the comment and decrement the post's `comments_count`
    /// (floored at zero) atomically.
    async fn delete(&self, comment: &Comment) -> Result<(), AppError>;

    /// Comments on a post, oldest first.
    async fn find_by_post(&self, post_id: i64) -> Result<Vec<Comment>, AppError>;
}
