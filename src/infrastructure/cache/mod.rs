//! Cache Module
//!
//! Redis connection management plus the two Redis-backed ports:
//!
//! - [`RedisPresence`]: online status as keys with a TTL
//! - [`RedisEventPublisher`]: domain events as JSON over Redis pub/sub
//!
//! All keys and channels carry the configured prefix, see [`keys`].

mod event_bus;
mod presence;

pub use event_bus::RedisEventPublisher;
pub use presence::RedisPresence;

use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

use crate::config::RedisSettings;

/// Creates a Redis connection manager with automatic reconnection.
#[instrument(skip(settings), fields(url = %settings.url))]
pub async fn create_redis_client(
    settings: &RedisSettings,
) -> Result<ConnectionManager, redis::RedisError> {
    info!("Connecting to Redis...");
    let client = Client::open(settings.url.as_str())?;
    let manager = ConnectionManager::new(client).await?;
    info!("Redis connection established");
    Ok(manager)
}

/// Key and channel naming.
pub mod keys {
    /// Segment for user presence keys (e.g., "linkme:presence:42")
    pub const USER_PRESENCE: &str = "presence";

    /// Presence key for a user
    #[inline]
    pub fn presence(prefix: &str, user_id: impl std::fmt::Display) -> String {
        format!("{}:{}:{}", prefix, USER_PRESENCE, user_id)
    }

    /// Pub/sub channel for an event topic
    #[inline]
    pub fn channel(prefix: &str, topic: &str) -> String {
        format!("{}:{}", prefix, topic)
    }
}
