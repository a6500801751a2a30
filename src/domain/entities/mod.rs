//! # Domain Entities
//!
//! Core domain entities. All entities map directly to their database tables
//! and reference each other by id only.
//!
//! - **User**: account, credentials, verification/reset state
//! - **Follow**: directed social-graph edge
//! - **Post**, **Comment**, **Like**: user content
//! - **Notification**: derived from likes, comments and follows
//! - **Conversation**, **Message**: direct messaging
//!
//! Each entity has an associated repository trait implemented in the
//! infrastructure layer.

mod comment;
mod conversation;
mod follow;
mod like;
mod notification;
mod post;
mod user;

pub use comment::{Comment, CommentRepository};
pub use conversation::{
    Conversation, ConversationPair, ConversationRepository, Message, MessageBody,
};
pub use follow::{Follow, FollowCounts, FollowRepository};
pub use like::{Like, LikeRepository, LikeToggle};
pub use notification::{Notification, NotificationKey, NotificationKind, NotificationRepository};
pub use post::{Post, PostRepository};
pub use user::{User, UserRepository, UserSummary};
