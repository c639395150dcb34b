use redis::{Client, RedisError, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        value
            .map(|v| {
                serde_json::from_str(&v).map_err(|e| {
                    RedisError::from((
                        redis::ErrorKind::TypeError,
                        "Deserialization error",
                        e.to_string(),
                    ))
                })
            })
            .transpose()
    }

    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> redis::RedisResult<()> {
        let serialized = serde_json::to_string(value).map_err(|e| {
            RedisError::from((
                redis::ErrorKind::TypeError,
                "Serialization error",
                e.to_string(),
            ))
        })?;

        redis::cmd("SET")
            .arg(key)
            .arg(serialized)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut self.connection.clone())
            .await
    }

    /// Delete every key matching a glob pattern.
    pub async fn delete_pattern(&self, pattern: &str) -> redis::RedisResult<()> {
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut self.connection.clone())
            .await?;

        if !keys.is_empty() {
            let _: () = redis::cmd("DEL")
                .arg(&keys)
                .query_async(&mut self.connection.clone())
                .await?;
        }

        Ok(())
    }

    pub async fn ping(&self) -> redis::RedisResult<()> {
        let _: String = redis::cmd("PING")
            .query_async(&mut self.connection.clone())
            .await?;
        Ok(())
    }
}

/// Read-through cache in front of database reads.
///
/// Redis is optional: without it every call goes straight to the loader.
/// Redis failures are logged and never fail the request.
#[derive(Clone, Default)]
pub struct QueryCache {
    redis: Option<RedisCache>,
}

impl QueryCache {
    pub fn new(redis: Option<RedisCache>) -> Self {
        Self { redis }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.redis.is_some()
    }

    pub async fn get_or_load<T, E, F, Fut>(&self, key: &str, ttl: Duration, load: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(redis) = &self.redis else {
            return load().await;
        };

        match redis.get::<T>(key).await {
            Ok(Some(hit)) => {
                debug!("Cache hit: {key}");
                return Ok(hit);
            }
            Ok(None) => debug!("Cache miss: {key}"),
            Err(e) => warn!("Cache read failed for {key}: {e}"),
        }

        let value = load().await?;
        if let Err(e) = redis.set(key, &value, ttl).await {
            warn!("Cache write failed for {key}: {e}");
        }
        Ok(value)
    }

    /// Drop cached entries matching each pattern.
    pub async fn invalidate(&self, patterns: &[&str]) {
        let Some(redis) = &self.redis else {
            return;
        };
        for pattern in patterns {
            if let Err(e) = redis.delete_pattern(pattern).await {
                warn!("Cache invalidation failed for {pattern}: {e}");
            }
        }
    }

    /// `None` when Redis is not configured.
    pub async fn healthy(&self) -> Option<bool> {
        match &self.redis {
            Some(redis) => Some(redis.ping().await.is_ok()),
            None => None,
        }
    }
}

/// Cache key generators
pub mod keys {
    use uuid::Uuid;

    pub const DJ_LIST: &str = "djs:list";
    pub const ALL_DJS: &str = "djs:*";
    pub const ALL_FINANCE: &str = "finance:*";

    pub fn finance_summary(user_id: Uuid) -> String {
        format!("finance:summary:{user_id}")
    }

    pub fn events_summary(user_id: Uuid) -> String {
        format!("finance:events:{user_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn disabled_cache_always_loads() {
        let cache = QueryCache::disabled();
        assert!(!cache.is_enabled());

        let mut calls = 0;
        for _ in 0..2 {
            let value: Result<u32, ()> = cache
                .get_or_load("k", Duration::from_secs(1), || {
                    calls += 1;
                    async { Ok(7) }
                })
                .await;
            assert_eq!(value, Ok(7));
        }
        assert_eq!(calls, 2);
        assert_eq!(cache.healthy().await, None);
    }

    #[tokio::test]
    async fn loader_errors_pass_through() {
        let cache = QueryCache::disabled();
        let value: Result<u32, &str> = cache
            .get_or_load("k", Duration::from_secs(1), || async { Err("db down") })
            .await;
        assert_eq!(value, Err("db down"));
    }

    #[test]
    fn finance_keys_share_the_invalidation_prefix() {
        let id = Uuid::nil();
        assert!(keys::finance_summary(id).starts_with("finance:"));
        assert!(keys::events_summary(id).starts_with("finance:"));
        assert!(keys::DJ_LIST.starts_with("djs:"));
    }
}
