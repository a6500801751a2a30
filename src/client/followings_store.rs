//! Users followed by the signed-in user.

use super::api::ApiClient;
use crate::domain::UserSummary;

#[derive(Debug, Clone, Default)]
pub struct FollowingsStore {
    pub followings: Vec<UserSummary>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl FollowingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_following(&self, user_id: i64) -> bool {
        self.followings.iter().any(|u| u.id == user_id)
    }

    pub async fn fetch(&mut self, client: &ApiClient) {
        self.is_loading = true;
        self.error = None;
        match client.my_followings().await {
            Ok(followings) => {
                tracing::debug!(count = followings.len(), "Followings loaded");
                self.followings = followings;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching followings");
                self.error = Some(e.to_string());
            }
        }
        self.is_loading = false;
    }

    /// Reload after a follow toggle.
    pub async fn refresh(&mut self, client: &ApiClient) {
        self.fetch(client).await;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
