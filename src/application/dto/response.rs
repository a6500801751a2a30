//! Response DTOs
//!
//! Data structures for API response bodies. They also deserialize so the
//! client module can reuse them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Comment, Conversation, FollowCounts, LikeToggle, Message, MessageBody, Notification,
    NotificationKind, Post, User, UserSummary,
};

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Plain acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: ProfileResponse,
}

/// The authenticated user's own profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            photo_url: user.photo_url,
            bio: user.bio,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

/// Another user's profile as seen by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub id: i64,
    pub name: String,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub followers_count: i64,
    pub following_count: i64,
    pub posts_count: i64,
    pub is_following: bool,
    pub is_self: bool,
}

impl PublicProfileResponse {
    pub fn new(
        user: User,
        counts: FollowCounts,
        posts_count: i64,
        is_following: bool,
        viewer_id: i64,
    ) -> Self {
        Self {
            is_self: user.id == viewer_id,
            id: user.id,
            name: user.name,
            photo_url: user.photo_url,
            bio: user.bio,
            created_at: user.created_at,
            followers_count: counts.followers,
            following_count: counts.following,
            posts_count,
            is_following,
        }
    }
}

/// Result of a follow toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowToggleResponse {
    /// Whether the caller follows the target after the toggle
    pub following: bool,
    /// Target's follower total
    pub followers_count: i64,
    /// Caller's following total
    pub following_count: i64,
}

/// Post with author and caller-specific like state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub content: String,
    pub media_url: Option<String>,
    pub author: UserSummary,
    pub likes_count: i32,
    pub comments_count: i32,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostResponse {
    pub fn new(post: Post, author: UserSummary, is_liked: bool) -> Self {
        Self {
            id: post.id,
            content: post.content,
            media_url: post.media_url,
            author,
            likes_count: post.likes_count,
            comments_count: post.comments_count,
            is_liked,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Like state of a post for the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: i32,
}

impl From<LikeToggle> for LikeResponse {
    fn from(toggle: LikeToggle) -> Self {
        Self {
            liked: toggle.liked,
            likes_count: toggle.likes_count,
        }
    }
}

/// Comment with its author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    pub author: UserSummary,
    pub created_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn new(comment: Comment, author: UserSummary) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            content: comment.content,
            author,
            created_at: comment.created_at,
        }
    }
}

/// Notification with the acting user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub actor: UserSummary,
    pub post_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationResponse {
    pub fn new(notification: Notification, actor: UserSummary) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            actor,
            post_id: notification.post_id,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

/// `{ "count": n }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

/// `{ "updated": n }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// A direct message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: Option<String>,
    pub sticker: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for ChatMessageResponse {
    fn from(message: Message) -> Self {
        let (content, sticker) = match message.body {
            MessageBody::Text(text) => (Some(text), None),
            MessageBody::Sticker(sticker) => (None, Some(sticker)),
        };
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            content,
            sticker,
            created_at: message.created_at,
        }
    }
}

/// A conversation from the caller's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: i64,
    pub participant: UserSummary,
    pub is_online: bool,
    pub last_message: Option<ChatMessageResponse>,
    pub unread_count: i32,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ConversationResponse {
    pub fn new(
        conversation: &Conversation,
        viewer_id: i64,
        participant: UserSummary,
        is_online: bool,
        last_message: Option<Message>,
    ) -> Self {
        Self {
            id: conversation.id,
            participant,
            is_online,
            last_message: last_message.map(ChatMessageResponse::from),
            unread_count: conversation.unread_for(viewer_id).unwrap_or(0),
            last_message_at: conversation.last_message_at,
            created_at: conversation.created_at,
        }
    }
}

/// Sticker catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickersResponse {
    pub stickers: Vec<String>,
}
