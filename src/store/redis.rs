//! Redis cache store implementation.

use super::CacheStore;
use crate::error::{Error, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

/// Configuration for the Redis store.
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,
    pub connection_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        RedisConfig {
            url: "redis://127.0.0.1:6379".to_string(),
            connection_timeout: Duration::from_secs(5),
        }
    }
}

/// Redis-backed cache store using a managed async connection.
///
/// Namespaces map to Redis hashes: `hash_get`/`hash_set` are HGET/HSET
/// against the namespace key, `delete_namespace` is a single DEL, and the
/// flat `get` is a plain GET. Cheaply cloneable; clones share the
/// underlying connection, which multiplexes concurrent commands.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Create a Redis store from configuration.
    ///
    /// # Errors
    /// Returns `Err` if the URL is invalid or the initial connection
    /// cannot be established within the configured timeout.
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| Error::ConfigError(format!("Invalid Redis URL {}: {}", config.url, e)))?;

        let conn = tokio::time::timeout(config.connection_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                Error::Timeout(format!(
                    "Redis connection to {} timed out after {:?}",
                    config.url, config.connection_timeout
                ))
            })?
            .map_err(|e| Error::StoreError(format!("Redis connection failed: {}", e)))?;

        info!("✓ Redis store initialized at {}", config.url);
        Ok(RedisStore { conn })
    }

    /// Create from a connection URL directly.
    ///
    /// # Errors
    /// Returns `Err` if the URL is invalid or the connection fails.
    pub async fn from_url(url: impl Into<String>) -> Result<Self> {
        Self::new(RedisConfig {
            url: url.into(),
            ..Default::default()
        })
        .await
    }
}

impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key)
            .await
            .map_err(|e| Error::StoreError(format!("Redis GET failed for key {}: {}", key, e)))
    }

    async fn hash_get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        conn.hget(namespace, key).await.map_err(|e| {
            Error::StoreError(format!(
                "Redis HGET failed for {}/{}: {}",
                namespace, key, e
            ))
        })
    }

    async fn hash_set(
        &self,
        namespace: &str,
        key: &str,
        payload: String,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let mut conn = self.conn.clone();

        let _: () = conn.hset(namespace, key, payload).await.map_err(|e| {
            Error::StoreError(format!(
                "Redis HSET failed for {}/{}: {}",
                namespace, key, e
            ))
        })?;

        // Redis expires the hash as a whole, so the TTL rides on the
        // namespace key rather than the individual field.
        if let Some(d) = ttl {
            let _: () = conn
                .expire(namespace, d.as_secs() as i64)
                .await
                .map_err(|e| {
                    Error::StoreError(format!(
                        "Redis EXPIRE failed for namespace {}: {}",
                        namespace, e
                    ))
                })?;
            debug!("✓ Redis HSET {}/{} (TTL: {:?})", namespace, key, d);
        } else {
            debug!("✓ Redis HSET {}/{}", namespace, key);
        }

        Ok(())
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<()> {
        let mut conn = self.conn.clone();

        let _: () = conn.del(namespace).await.map_err(|e| {
            Error::StoreError(format!(
                "Redis DEL failed for namespace {}: {}",
                namespace, e
            ))
        })?;

        debug!("✓ Redis DEL namespace {}", namespace);
        Ok(())
    }
}
