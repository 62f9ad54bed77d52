use redis::{Client, RedisError, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: CacheConfig,
}

impl RedisCache {
    pub async fn new(redis_url: &str, config: CacheConfig) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection, config })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get a value from cache
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        match value {
            Some(v) => {
                let deserialized = serde_json::from_str(&v).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::TypeError,
                        "Deserialization error",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with a TTL
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> redis::RedisResult<()> {
        let serialized = serde_json::to_string(value).map_err(|e| {
            redis::RedisError::from((
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

    /// Delete a key from cache
    pub async fn delete(&self, key: &str) -> redis::RedisResult<()> {
        redis::cmd("DEL")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await
    }

    /// Drop the enriched worker list and, if given, one cached profile.
    ///
    /// Failures only cost freshness until the TTL runs out, so they are logged.
    pub async fn invalidate_worker(&self, user_id: Option<uuid::Uuid>) {
        if let Err(e) = self.delete(keys::WORKER_DIRECTORY).await {
            tracing::warn!("Cache invalidation failed for worker directory: {e}");
        }
        if let Some(id) = user_id {
            if let Err(e) = self.delete(&keys::profile(&id.to_string())).await {
                tracing::warn!("Cache invalidation failed for profile {id}: {e}");
            }
        }
    }
}

/// Cache key generators
pub mod keys {
    /// Enriched list of every worker with its average rating.
    pub const WORKER_DIRECTORY: &str = "workers:directory";

    /// Generate key for a single profile
    pub fn profile(id: &str) -> String {
        format!("profile:{}", id)
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub directory_ttl: Duration,
    pub profile_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory_ttl: Duration::from_secs(300), // 5 minutes
            profile_ttl: Duration::from_secs(900),   // 15 minutes
        }
    }
}
