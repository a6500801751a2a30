//! # Domain Layer
//!
//! Core business rules of LinkMe, independent of HTTP, SQL and Redis.
//!
//! ## Structure
//!
//! - **entities**: users, social graph, content, notifications, messaging
//! - **services**: cross-entity rules (notification policy)
//! - **events**: outbound event types and the publisher port
//! - **presence**: online-status port
//!
//! Repository traits live next to their entities; implementations live in
//! the infrastructure layer.

pub mod entities;
pub mod events;
pub mod presence;
pub mod services;

pub use entities::*;
pub use events::{DomainEvent, EventPublisher, NoopPublisher};
pub use presence::{OfflinePresence, PresenceTracker};
