//! Query interceptor - the cache-or-execute entry point.
//!
//! Wraps a live [`QueryExecutor`] with cache-aside behavior: queries that
//! opted in are looked up in the store, served from cache on a hit, and
//! executed live then populated on a miss. Queries that did not opt in
//! pass straight through. Every cache-path failure fails open to the
//! live source; only live-execution errors reach the caller.

use crate::error::Result;
use crate::executor::QueryExecutor;
use crate::key::QueryKeyBuilder;
use crate::observability::{CacheMetrics, NoOpMetrics, TtlPolicy};
use crate::query::{Query, ResultShape};
use crate::record::Record;
use crate::result::{self, QueryResult};
use crate::store::CacheStore;
use std::time::{Duration, Instant};

/// Bound applied to every cache-store round-trip. A slow store must never
/// hold a request hostage; past the deadline the lookup counts as a miss.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Cache-aside decorator around a live query executor.
///
/// The caller composes the interceptor explicitly with its executor at
/// each call site; nothing global is patched. One interceptor is shared
/// per process around one store connection.
///
/// # Example
///
/// ```ignore
/// let store = InMemoryStore::new();
/// let interceptor = QueryInterceptor::new(store);
///
/// let query = Query::find("blogs")
///     .where_field("author", "u1")
///     .cacheable_in("u1");
///
/// let blogs: QueryResult<Blog> = interceptor.execute(&query, &executor).await?;
/// ```
pub struct QueryInterceptor<S: CacheStore> {
    store: S,
    metrics: Box<dyn CacheMetrics>,
    pub(crate) ttl_policy: TtlPolicy,
    pub(crate) lookup_timeout: Duration,
}

impl<S: CacheStore> QueryInterceptor<S> {
    /// Create a new interceptor over the given store.
    pub fn new(store: S) -> Self {
        QueryInterceptor {
            store,
            metrics: Box::new(NoOpMetrics),
            ttl_policy: TtlPolicy::default(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set custom TTL policy.
    pub fn with_ttl_policy(mut self, policy: TtlPolicy) -> Self {
        self.ttl_policy = policy;
        self
    }

    /// Bound every cache-store round-trip with this timeout.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Create a builder for per-operation overrides.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let result = interceptor
    ///     .builder()
    ///     .with_ttl(Duration::from_secs(60))
    ///     .execute(&query, &executor)
    ///     .await?;
    /// ```
    pub fn builder(&mut self) -> crate::builder::ExecutionBuilder<'_, S> {
        crate::builder::ExecutionBuilder::new(self)
    }

    /// Execute a query, serving it from cache when possible.
    ///
    /// State machine per execution:
    /// - not cacheable: run live, return.
    /// - cacheable, cache hit: rehydrate, return.
    /// - cacheable, cache miss: run live, populate best-effort, return.
    ///
    /// # Errors
    ///
    /// Only live-execution failures propagate. Store errors, lookup
    /// timeouts, corrupt payloads, and population failures are logged and
    /// degrade to miss/no-op.
    pub async fn execute<T, E>(&self, query: &Query, executor: &E) -> Result<QueryResult<T>>
    where
        T: Record,
        E: QueryExecutor<T>,
    {
        let Some(options) = query.cache_options() else {
            // Strict opt-in: the store is never contacted.
            return executor.run(query).await;
        };

        let timer = Instant::now();
        let namespace = options.namespace();
        let cache_key = QueryKeyBuilder::for_query(query);

        debug!("» cache operation for {}/{}", namespace, cache_key);

        if let Some(cached) = self.lookup::<T>(namespace, &cache_key, query.shape()).await {
            self.metrics.record_hit(&cache_key, timer.elapsed());
            info!("✓ served {}/{} from cache", namespace, cache_key);
            return Ok(cached);
        }

        self.metrics.record_miss(&cache_key, timer.elapsed());
        let live = executor.run(query).await?;

        self.populate(namespace, &cache_key, query.collection(), &live)
            .await;

        Ok(live)
    }

    /// Direct store access (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Cache lookup; `None` on miss and on every cache-path failure.
    async fn lookup<T: Record>(
        &self,
        namespace: &str,
        cache_key: &str,
        shape: ResultShape,
    ) -> Option<QueryResult<T>> {
        let lookup = self.store.hash_get(namespace, cache_key);
        let payload = match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(Some(payload))) => payload,
            Ok(Ok(None)) => return None,
            Ok(Err(e)) => {
                warn!("cache lookup failed for {}/{}: {}", namespace, cache_key, e);
                self.metrics.record_error(cache_key, &e.to_string());
                return None;
            }
            Err(_) => {
                warn!(
                    "cache lookup for {}/{} timed out after {:?}",
                    namespace, cache_key, self.lookup_timeout
                );
                return None;
            }
        };

        match result::rehydrate::<T>(&payload) {
            Ok(cached) if cached.shape() == shape => Some(cached),
            Ok(_) => {
                // Same key populated by a query of the other shape;
                // recompute rather than hand back the wrong shape.
                debug!(
                    "cached shape mismatch for {}/{}, treating as miss",
                    namespace, cache_key
                );
                None
            }
            Err(e) => {
                warn!(
                    "corrupt cache payload for {}/{}: {}",
                    namespace, cache_key, e
                );
                self.metrics.record_error(cache_key, &e.to_string());
                None
            }
        }
    }

    /// Best-effort population; never fails the request.
    async fn populate<T: Record>(
        &self,
        namespace: &str,
        cache_key: &str,
        collection: &str,
        live: &QueryResult<T>,
    ) {
        let payload = match result::dehydrate(live) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    "result for {}/{} is not cacheable: {}",
                    namespace, cache_key, e
                );
                self.metrics.record_error(cache_key, &e.to_string());
                return;
            }
        };

        let ttl = self.ttl_policy.get_ttl(collection);
        let set = self.store.hash_set(namespace, cache_key, payload, ttl);
        match tokio::time::timeout(self.lookup_timeout, set).await {
            Ok(Ok(())) => debug!("✓ populated {}/{}", namespace, cache_key),
            Ok(Err(e)) => {
                warn!("cache population failed for {}/{}: {}", namespace, cache_key, e);
                self.metrics.record_error(cache_key, &e.to_string());
            }
            Err(_) => warn!(
                "cache population for {}/{} timed out after {:?}",
                namespace, cache_key, self.lookup_timeout
            ),
        }
    }
}
