//! Builder pattern for per-operation overrides.

use crate::error::Result;
use crate::executor::QueryExecutor;
use crate::observability::TtlPolicy;
use crate::query::Query;
use crate::record::Record;
use crate::result::QueryResult;
use crate::store::CacheStore;
use crate::QueryInterceptor;
use std::time::Duration;

/// Fluent builder scoping TTL and lookup-timeout overrides to a single
/// execution, leaving the interceptor's defaults untouched afterwards.
///
/// # Example
///
/// ```ignore
/// let result = interceptor
///     .builder()
///     .with_ttl(Duration::from_secs(60))
///     .with_lookup_timeout(Duration::from_millis(250))
///     .execute(&query, &executor)
///     .await?;
/// ```
pub struct ExecutionBuilder<'a, S: CacheStore> {
    interceptor: &'a mut QueryInterceptor<S>,
    ttl_override: Option<Duration>,
    timeout_override: Option<Duration>,
}

impl<'a, S: CacheStore> ExecutionBuilder<'a, S> {
    pub(crate) fn new(interceptor: &'a mut QueryInterceptor<S>) -> Self {
        Self {
            interceptor,
            ttl_override: None,
            timeout_override: None,
        }
    }

    /// Override the TTL for this operation only.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_override = Some(ttl);
        self
    }

    /// Override the cache round-trip bound for this operation only.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_override = Some(timeout);
        self
    }

    /// Execute the query with the configured overrides applied, then
    /// restore the interceptor's defaults.
    ///
    /// # Errors
    ///
    /// Propagates live-execution failures, same as
    /// [`QueryInterceptor::execute`].
    pub async fn execute<T, E>(self, query: &Query, executor: &E) -> Result<QueryResult<T>>
    where
        T: Record,
        E: QueryExecutor<T>,
    {
        let saved_policy = self.ttl_override.map(|ttl| {
            std::mem::replace(&mut self.interceptor.ttl_policy, TtlPolicy::Fixed(ttl))
        });
        let saved_timeout = self
            .timeout_override
            .map(|timeout| std::mem::replace(&mut self.interceptor.lookup_timeout, timeout));

        let result = self.interceptor.execute(query, executor).await;

        if let Some(policy) = saved_policy {
            self.interceptor.ttl_policy = policy;
        }
        if let Some(timeout) = saved_timeout {
            self.interceptor.lookup_timeout = timeout;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::InMemoryExecutor;
    use crate::observability::DEFAULT_TTL;
    use crate::store::InMemoryStore;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Blog {
        id: String,
        author: String,
    }

    fn seeded_executor() -> InMemoryExecutor {
        let executor = InMemoryExecutor::new();
        executor
            .insert(
                "blogs",
                Blog {
                    id: "b1".to_string(),
                    author: "u1".to_string(),
                },
            )
            .expect("insert failed");
        executor
    }

    #[tokio::test]
    async fn test_builder_basic() {
        let mut interceptor = QueryInterceptor::new(InMemoryStore::new());
        let executor = seeded_executor();

        let query = Query::find("blogs")
            .where_field("author", "u1")
            .cacheable_in("u1");

        let result: QueryResult<Blog> = interceptor
            .builder()
            .execute(&query, &executor)
            .await
            .expect("execute failed");

        assert_eq!(result.records().expect("expected collection").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_builder_ttl_override_applies_to_entry() {
        let store = InMemoryStore::new();
        let mut interceptor = QueryInterceptor::new(store.clone());
        let executor = seeded_executor();

        let query = Query::find("blogs")
            .where_field("author", "u1")
            .cacheable_in("u1");

        let _: QueryResult<Blog> = interceptor
            .builder()
            .with_ttl(Duration::from_secs(60))
            .execute(&query, &executor)
            .await
            .expect("execute failed");

        // Still cached well past the default TTL.
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(store.namespace_len("u1"), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(store.namespace_len("u1"), 0);
    }

    #[tokio::test]
    async fn test_builder_restores_defaults() {
        let mut interceptor = QueryInterceptor::new(InMemoryStore::new());
        let executor = seeded_executor();

        let query = Query::find("blogs")
            .where_field("author", "u1")
            .cacheable_in("u1");

        let _: QueryResult<Blog> = interceptor
            .builder()
            .with_ttl(Duration::from_secs(300))
            .with_lookup_timeout(Duration::from_millis(50))
            .execute(&query, &executor)
            .await
            .expect("execute failed");

        assert_eq!(interceptor.ttl_policy, TtlPolicy::Fixed(DEFAULT_TTL));
        assert_eq!(
            interceptor.lookup_timeout,
            crate::interceptor::DEFAULT_LOOKUP_TIMEOUT
        );
    }
}
