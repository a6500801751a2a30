//! Notification list and unread badge.

use super::api::ApiClient;
use crate::application::dto::response::NotificationResponse;

#[derive(Debug, Clone, Default)]
pub struct NotificationsStore {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: i64,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl NotificationsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }

    pub async fn fetch(&mut self, client: &ApiClient) {
        self.is_loading = true;
        self.error = None;
        match client.notifications().await {
            Ok(notifications) => self.notifications = notifications,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching notifications");
                self.error = Some(e.to_string());
            }
        }
        self.is_loading = false;
    }

    pub async fn fetch_unread_count(&mut self, client: &ApiClient) {
        match client.unread_notifications().await {
            Ok(response) => self.unread_count = response.count,
            Err(e) => tracing::warn!(error = %e, "Error fetching unread count"),
        }
    }

    pub async fn mark_all_as_read(&mut self, client: &ApiClient) {
        match client.mark_all_notifications_read().await {
            Ok(_) => self.mark_all_read_locally(),
            Err(e) => tracing::warn!(error = %e, "Error marking notifications as read"),
        }
    }

    pub fn mark_all_read_locally(&mut self) {
        self.unread_count = 0;
        for notification in &mut self.notifications {
            notification.is_read = true;
        }
    }

    /// A realtime notification arrived.
    pub fn increment_unread(&mut self) {
        self.unread_count += 1;
    }

    pub fn decrement_unread(&mut self) {
        self.unread_count = (self.unread_count - 1).max(0);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
