//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **UserRepository** - accounts, verification and reset state, search
//! - **FollowRepository** - follow edges
//! - **PostRepository** - posts with cursor pagination
//! - **CommentRepository** - comments and the post comment counter
//! - **LikeRepository** - likes and the post like counter
//! - **NotificationRepository** - deduplicated notifications
//! - **ConversationRepository** - conversations, messages and unread counters
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use linkme::infrastructure::repositories::{PgPostRepository, PgUserRepository};
//!
//! fn setup_repositories(pool: PgPool) {
//!     let user_repo = PgUserRepository::new(pool.clone());
//!     let post_repo = PgPostRepository::new(pool);
//! }
//! ```

pub mod comment_repository;
pub mod conversation_repository;
pub mod follow_repository;
pub mod like_repository;
pub mod notification_repository;
pub mod post_repository;
pub mod user_repository;

pub use comment_repository::PgCommentRepository;
pub use conversation_repository::PgConversationRepository;
pub use follow_repository::PgFollowRepository;
pub use like_repository::PgLikeRepository;
pub use notification_repository::PgNotificationRepository;
pub use post_repository::PgPostRepository;
pub use user_repository::PgUserRepository;
