//! Client
//!
//! Typed HTTP client for the LinkMe API and the state stores a frontend
//! keeps in sync with it. Stores are plain structs mutated through
//! `&mut self`; the client is passed to each action by reference.

pub mod api;
pub mod auth_store;
pub mod followings_store;
pub mod notifications_store;
pub mod posts_store;

pub use api::{ApiClient, ClientError};
pub use auth_store::AuthStore;
pub use followings_store::FollowingsStore;
pub use notifications_store::NotificationsStore;
pub use posts_store::PostsStore;
