//! Presence Cache
//!
//! A user is online while their presence key exists; every heartbeat
//! rewrites the key with a fresh TTL.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::keys;
use crate::domain::PresenceTracker;
use crate::shared::error::AppError;

/// Redis-backed presence tracker
#[derive(Clone)]
pub struct RedisPresence {
    redis: ConnectionManager,
    prefix: String,
    ttl_secs: u64,
}

impl RedisPresence {
    pub fn new(redis: ConnectionManager, prefix: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            redis,
            prefix: prefix.into(),
            ttl_secs,
        }
    }
}

#[async_trait]
impl PresenceTracker for RedisPresence {
    async fn touch(&self, user_id: i64) -> Result<(), AppError> {
        let key = keys::presence(&self.prefix, user_id);
        let now = chrono::Utc::now().timestamp();

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(&key, now, self.ttl_secs).await?;

        Ok(())
    }

    async fn online(&self, user_ids: &[i64]) -> Result<Vec<i64>, AppError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = user_ids
            .iter()
            .map(|id| keys::presence(&self.prefix, id))
            .collect();

        let mut conn = self.redis.clone();
        let values: Vec<Option<i64>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await?;

        Ok(user_ids
            .iter()
            .zip(values)
            .filter_map(|(id, value)| value.map(|_| *id))
            .collect())
    }
}
