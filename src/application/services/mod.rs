//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: registration, verification, login, password reset
//! - **UserService**: profiles and user search
//! - **FollowService**: follow toggling and follower lists
//! - **PostService**: posts and comments
//! - **LikeService**: like toggling
//! - **NotificationService**: notification listing and read state
//! - **ChatService**: conversations, messages, presence, stickers

use std::collections::HashMap;

use crate::domain::{UserRepository, UserSummary};
use crate::shared::error::AppError;

pub mod auth_service;
pub mod chat_service;
pub mod follow_service;
pub mod like_service;
pub mod notification_service;
pub mod post_service;
pub mod user_service;

pub use auth_service::{
    decode_token, issue_token, AuthError, AuthService, AuthServiceImpl, Claims,
};
pub use chat_service::{ChatError, ChatService, ChatServiceImpl};
pub use follow_service::{FollowError, FollowService, FollowServiceImpl};
pub use like_service::{LikeError, LikeService, LikeServiceImpl};
pub use notification_service::{NotificationService, NotificationServiceImpl, Notifier};
pub use post_service::{PostError, PostService, PostServiceImpl};
pub use user_service::{UserError, UserService, UserServiceImpl};

/// Load user summaries keyed by id.
pub(crate) async fn load_summaries<U>(
    user_repo: &U,
    ids: &[i64],
) -> Result<HashMap<i64, UserSummary>, AppError>
where
    U: UserRepository + ?Sized,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    Ok(user_repo
        .find_summaries(&unique)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect())
}

/// Summary for `id`, or a placeholder when the user row is gone.
pub(crate) fn summary_or_placeholder(
    summaries: &HashMap<i64, UserSummary>,
    id: i64,
) -> UserSummary {
    summaries.get(&id).cloned().unwrap_or_else(|| UserSummary {
        id,
        name: "Unknown user".to_string(),
        photo_url: None,
    })
}
