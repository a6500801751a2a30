//! Event Bus
//!
//! Publishes domain events as JSON on Redis pub/sub channels. Realtime push,
//! the search indexer and the mailer subscribe on the other side.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::keys;
use crate::domain::{DomainEvent, EventPublisher};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Redis pub/sub event publisher
#[derive(Clone)]
pub struct RedisEventPublisher {
    redis: ConnectionManager,
    prefix: String,
}

impl RedisEventPublisher {
    pub fn new(redis: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            redis,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: DomainEvent) -> Result<(), AppError> {
        let channel = keys::channel(&self.prefix, &event.topic());
        let name = event.name();
        let payload = serde_json::to_string(&event)
            .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))?;

        let mut conn = self.redis.clone();
        let receivers: Result<i64, _> = conn.publish(&channel, payload).await;

        match receivers {
            Ok(receivers) => {
                tracing::debug!(event = name, %channel, receivers, "Event published");
                Ok(())
            }
            Err(e) => {
                metrics::record_publish_failure(name);
                Err(e.into())
            }
        }
    }
}
