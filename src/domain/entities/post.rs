//! Post entity and repository trait.
//!
//! Maps to the `posts` table. `likes_count` and `comments_count` are cached
//! counters maintained in the same transaction as the like/comment rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a post.
///
/// Maps to the `posts` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - user_id: BIGINT NOT NULL REFERENCES users(id)
/// - content: TEXT NOT NULL
/// - media_url: TEXT NULL
/// - likes_count / comments_count: INTEGER NOT NULL DEFAULT 0 CHECK (>= 0)
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub media_url: Option<String>,
    pub likes_count: i32,
    pub comments_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a fresh post with zeroed counters.
    pub fn new(id: i64, user_id: i64, content: String, media_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            content,
            media_url,
            likes_count: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Only the author may edit or delete a post.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Repository trait for Post data access operations.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError>;

    async fn create(&self, post: &Post) -> Result<Post, AppError>;

    /// Persist content and media changes. Counters are never written here.
    async fn update(&self, post: &Post) -> Result<Post, AppError>;

    /// Delete a post; likes, comments and notifications cascade.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// All posts, newest first, optionally strictly older than `before`.
    async fn feed(&self, before: Option<i64>, limit: i64) -> Result<Vec<Post>, AppError>;

    /// Posts authored by `user_id`, newest first.
    async fn find_by_user(
        &self,
        user_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Post>, AppError>;

    async fn count_by_user(&self, user_id: i64) -> Result<i64, AppError>;
}
