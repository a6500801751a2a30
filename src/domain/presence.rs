//! Online presence port.

use async_trait::async_trait;

use crate::shared::error::AppError;

/// Tracks which users sent a heartbeat recently.
#[async_trait]
pub trait PresenceTracker: Send + Sync {
    /// Record a heartbeat for `user_id`.
    async fn touch(&self, user_id: i64) -> Result<(), AppError>;

    /// The subset of `user_ids` currently online.
    async fn online(&self, user_ids: &[i64]) -> Result<Vec<i64>, AppError>;
}

/// Tracker that reports everyone offline. Used when no presence store is
/// configured.
pub struct OfflinePresence;

#[async_trait]
impl PresenceTracker for OfflinePresence {
    async fn touch(&self, _user_id: i64) -> Result<(), AppError> {
        Ok(())
    }

    async fn online(&self, _user_ids: &[i64]) -> Result<Vec<i64>, AppError> {
        Ok(Vec::new())
    }
}
