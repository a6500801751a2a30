//! Notification Policy
//!
//! Decides whether an action produces a notification at all, before the
//! repository-level deduplication gets a say.

use crate::domain::entities::{NotificationKey, NotificationKind};

/// Build the notification key for `actor_id` acting on `recipient_id`.
///
/// Returns `None` for self-actions: nobody is notified about liking,
/// commenting on or following their own content.
pub fn notification_for(
    actor_id: i64,
    recipient_id: i64,
    kind: NotificationKind,
    post_id: Option<i64>,
) -> Option<NotificationKey> {
    if actor_id == recipient_id {
        return None;
    }

    // Follow notifications are about the user, never a post.
    let post_id = match kind {
        NotificationKind::Follow => None,
        NotificationKind::Like | NotificationKind::Comment => post_id,
    };

    Some(NotificationKey {
        recipient_id,
        actor_id,
        kind,
        post_id,
    })
}
