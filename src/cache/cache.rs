//! Typed get/set/delete over the Redis pool

use super::error::{CacheError, CacheResult};
use super::RedisPool;
use async_trait::async_trait;
use bb8::PooledConnection;
use bb8_redis::RedisConnectionManager;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// JSON-encoded values stored under string keys
#[async_trait]
pub trait Cache {
    async fn get<T>(&self, key: &str) -> CacheResult<Option<T>>
    where
        T: DeserializeOwned + Send;

    async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> CacheResult<()>
    where
        T: Serialize + Sync;

    /// Store `value` only when `key` is not cached yet. Returns whether it
    /// was written.
    async fn set_if_absent<T>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> CacheResult<bool>
    where
        T: Serialize + Sync;

    /// Remove a key. Returns whether it existed.
    async fn delete(&self, key: &str) -> CacheResult<bool>;
}

/// Redis-backed cache sharing one bb8 pool
#[derive(Clone)]
pub struct RedisCache {
    pool: RedisPool,
    default_ttl: Duration,
}

impl RedisCache {
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            default_ttl: Duration::from_secs(300),
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub async fn get_connection(
        &self,
    ) -> CacheResult<PooledConnection<'_, RedisConnectionManager>> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::ConnectionError(e.to_string()))
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get<T>(&self, key: &str) -> CacheResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let mut conn = self.get_connection().await?;
        let raw: Option<String> = redis::cmd("GET").arg(key).query_async(&mut *conn).await?;

        match raw {
            Some(payload) => {
                debug!(key = %key, "Cache hit");
                Ok(Some(serde_json::from_str(&payload)?))
            }
            None => {
                debug!(key = %key, "Cache miss");
                Ok(None)
            }
        }
    }

    async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> CacheResult<()>
    where
        T: Serialize + Sync,
    {
        let payload = serde_json::to_string(value)?;
        let ttl_secs = ttl.unwrap_or(self.default_ttl).as_secs().max(1);

        let mut conn = self.get_connection().await?;
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(payload)
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut *conn)
            .await?;

        Ok(())
    }

    async fn set_if_absent<T>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> CacheResult<bool>
    where
        T: Serialize + Sync,
    {
        let payload = serde_json::to_string(value)?;
        let ttl_secs = ttl.unwrap_or(self.default_ttl).as_secs().max(1);

        let mut conn = self.get_connection().await?;
        // nil reply when the key already exists
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(payload)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut *conn)
            .await?;

        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.get_connection().await?;
        let removed: i64 = redis::cmd("DEL").arg(key).query_async(&mut *conn).await?;
        Ok(removed > 0)
    }
}
