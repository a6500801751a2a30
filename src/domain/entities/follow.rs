//! Follow edge entity and repository trait.
//!
//! Maps to the `follows` table. The composite primary key
//! `(follower_id, followed_id)` is what keeps two concurrent follow toggles
//! from both inserting, and a CHECK constraint forbids self-follows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A directed follow edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: i64,
    pub followed_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Follower/following totals for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowCounts {
    pub followers: i64,
    pub following: i64,
}

/// Repository trait for the social graph.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Delete the edge if present, otherwise create it.
    ///
    /// Runs in one transaction. Returns `true` when the edge exists afterwards.
    async fn toggle(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError>;

    /// Whether `follower_id` currently follows `followed_id`.
    async fn is_following(&self, follower_id: i64, followed_id: i64) -> Result<bool, AppError>;

    /// Follower and following totals for a user.
    async fn counts(&self, user_id: i64) -> Result<FollowCounts, AppError>;

    /// Ids of users following `user_id`, most recent first.
    async fn followers(&self, user_id: i64) -> Result<Vec<i64>, AppError>;

    /// Ids of users `user_id` follows, most recent first.
    async fn following(&self, user_id: i64) -> Result<Vec<i64>, AppError>;
}
