//! Cache store adapters.
//!
//! The [`CacheStore`] trait is the crate's view of a networked key-value
//! store: a flat get, a hash-scoped get/set pair, and a bulk namespace
//! delete. Every operation is a network round-trip that may fail or time
//! out; adapters report failures to the caller and never swallow them.
//! The fail-open policy lives in the interceptor, not here.

#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "redis")]
pub use redis::{RedisConfig, RedisStore};

use crate::error::Result;
use std::time::Duration;

#[cfg(feature = "inmemory")]
use dashmap::DashMap;
#[cfg(feature = "inmemory")]
use std::sync::Arc;
#[cfg(feature = "inmemory")]
use tokio::time::Instant;

/// Backend-agnostic cache store contract.
pub trait CacheStore {
    /// Fetch a flat (non-namespaced) value.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Fetch the payload stored under `(namespace, key)`.
    async fn hash_get(&self, namespace: &str, key: &str) -> Result<Option<String>>;

    /// Store a payload under `(namespace, key)`, overwriting any prior
    /// value. With a TTL the entry expires on its own, independent of
    /// explicit deletion.
    async fn hash_set(
        &self,
        namespace: &str,
        key: &str,
        payload: String,
        ttl: Option<Duration>,
    ) -> Result<()>;

    /// Remove every entry under `namespace`. Idempotent; deleting an
    /// empty or unknown namespace is not an error.
    async fn delete_namespace(&self, namespace: &str) -> Result<()>;
}

#[cfg(feature = "inmemory")]
#[derive(Clone)]
struct Entry {
    payload: String,
    expires_at: Option<Instant>,
}

#[cfg(feature = "inmemory")]
impl Entry {
    fn new(payload: String, ttl: Option<Duration>) -> Self {
        Entry {
            payload,
            expires_at: ttl.map(|d| Instant::now() + d),
        }
    }

    fn fresh(&self) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() < at)
    }
}

/// In-memory cache store.
///
/// Thread-safe and cheaply cloneable; clones share the same underlying
/// maps, mirroring a shared store connection. Expiry uses the tokio
/// clock, so tests can drive it with paused time.
///
/// # Example
///
/// ```
/// # use query_cache::store::{CacheStore, InMemoryStore};
/// # async fn example() -> query_cache::Result<()> {
/// let store = InMemoryStore::new();
/// store.hash_set("u1", "k", "payload".to_string(), None).await?;
/// assert!(store.hash_get("u1", "k").await?.is_some());
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "inmemory")]
#[derive(Clone, Default)]
pub struct InMemoryStore {
    plain: Arc<DashMap<String, Entry>>,
    hashes: Arc<DashMap<String, DashMap<String, Entry>>>,
}

#[cfg(feature = "inmemory")]
impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a flat value, readable through [`CacheStore::get`].
    pub fn insert_plain(&self, key: &str, payload: String, ttl: Option<Duration>) {
        self.plain.insert(key.to_string(), Entry::new(payload, ttl));
    }

    /// Number of live entries under a namespace.
    pub fn namespace_len(&self, namespace: &str) -> usize {
        self.hashes
            .get(namespace)
            .map(|fields| fields.iter().filter(|entry| entry.fresh()).count())
            .unwrap_or(0)
    }
}

#[cfg(feature = "inmemory")]
impl CacheStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // Read the entry and release the shard guard before any removal.
        let hit = self.plain.get(key).map(|entry| {
            entry
                .fresh()
                .then(|| entry.payload.clone())
        });

        match hit {
            Some(Some(payload)) => Ok(Some(payload)),
            Some(None) => {
                self.plain.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn hash_get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let Some(fields) = self.hashes.get(namespace) else {
            return Ok(None);
        };

        // Read the entry and release the shard guard before any removal.
        let hit = fields.get(key).map(|entry| {
            entry
                .fresh()
                .then(|| entry.payload.clone())
        });

        match hit {
            Some(Some(payload)) => {
                debug!("✓ cache GET {}/{} -> HIT", namespace, key);
                Ok(Some(payload))
            }
            Some(None) => {
                // Expired; drop lazily.
                fields.remove(key);
                debug!("✓ cache GET {}/{} -> MISS (expired)", namespace, key);
                Ok(None)
            }
            None => {
                debug!("✓ cache GET {}/{} -> MISS", namespace, key);
                Ok(None)
            }
        }
    }

    async fn hash_set(
        &self,
        namespace: &str,
        key: &str,
        payload: String,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.hashes
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), Entry::new(payload, ttl));

        if let Some(d) = ttl {
            debug!("✓ cache SET {}/{} (TTL: {:?})", namespace, key, d);
        } else {
            debug!("✓ cache SET {}/{}", namespace, key);
        }
        Ok(())
    }

    async fn delete_namespace(&self, namespace: &str) -> Result<()> {
        let removed = self.hashes.remove(namespace).is_some();
        debug!(
            "✓ cache DEL namespace {} ({})",
            namespace,
            if removed { "cleared" } else { "already empty" }
        );
        Ok(())
    }
}
