//! Query descriptors - the read-request shape the interceptor wraps.

use serde_json::{Map, Value};

/// Declared shape of a query's result: one record or an ordered sequence.
///
/// Carried on the descriptor so the interceptor never has to sniff the
/// shape out of deserialized data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// A find-one style query: at most one record.
    Single,
    /// A find style query: zero or more records, order preserved.
    Collection,
}

/// Opt-in cache attributes attached to a query before execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    namespace: String,
}

impl CacheOptions {
    /// Logical bucket this query's cached result belongs to,
    /// typically an owner/tenant identifier. Defaults to `""`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// A read request against one collection of the backing document store.
///
/// Built fluently, then handed to [`QueryInterceptor::execute`] or
/// directly to a [`QueryExecutor`]. Immutable once execution begins:
/// the interceptor only borrows it.
///
/// [`QueryInterceptor::execute`]: crate::interceptor::QueryInterceptor::execute
/// [`QueryExecutor`]: crate::executor::QueryExecutor
///
/// # Example
///
/// ```
/// use query_cache::Query;
///
/// let query = Query::find("blogs")
///     .where_field("author", "u1")
///     .cacheable_in("u1");
///
/// assert!(query.is_cacheable());
/// assert_eq!(query.collection(), "blogs");
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    collection: String,
    filter: Map<String, Value>,
    shape: ResultShape,
    cache: Option<CacheOptions>,
}

impl Query {
    /// Query for every record matching the filter.
    pub fn find(collection: impl Into<String>) -> Self {
        Query {
            collection: collection.into(),
            filter: Map::new(),
            shape: ResultShape::Collection,
            cache: None,
        }
    }

    /// Query for at most one record matching the filter.
    pub fn find_one(collection: impl Into<String>) -> Self {
        Query {
            collection: collection.into(),
            filter: Map::new(),
            shape: ResultShape::Single,
            cache: None,
        }
    }

    /// Add an equality condition to the filter.
    pub fn where_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    /// Replace the whole filter at once.
    pub fn with_filter(mut self, filter: Map<String, Value>) -> Self {
        self.filter = filter;
        self
    }

    /// Mark this query cacheable under the default (empty) namespace.
    ///
    /// Caching is strictly opt-in: without this call the interceptor
    /// passes straight through to live execution.
    pub fn cacheable(self) -> Self {
        self.cacheable_in("")
    }

    /// Mark this query cacheable under an explicit namespace,
    /// typically the owner's identifier.
    pub fn cacheable_in(mut self, namespace: impl Into<String>) -> Self {
        self.cache = Some(CacheOptions {
            namespace: namespace.into(),
        });
        self
    }

    /// Target collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Filter predicate fields.
    pub fn filter(&self) -> &Map<String, Value> {
        &self.filter
    }

    /// Declared result shape.
    pub fn shape(&self) -> ResultShape {
        self.shape
    }

    /// Cache attributes, if the query was marked cacheable.
    pub fn cache_options(&self) -> Option<&CacheOptions> {
        self.cache.as_ref()
    }

    /// Whether this query opted in to caching.
    pub fn is_cacheable(&self) -> bool {
        self.cache.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_to_uncacheable() {
        let query = Query::find("blogs").where_field("author", "u1");

        assert!(!query.is_cacheable());
        assert!(query.cache_options().is_none());
        assert_eq!(query.shape(), ResultShape::Collection);
    }

    #[test]
    fn test_find_one_shape() {
        let query = Query::find_one("blogs").where_field("_id", "b42");
        assert_eq!(query.shape(), ResultShape::Single);
    }

    #[test]
    fn test_cacheable_defaults_to_empty_namespace() {
        let query = Query::find("blogs").cacheable();

        let opts = query.cache_options().expect("cache options missing");
        assert_eq!(opts.namespace(), "");
    }

    #[test]
    fn test_cacheable_in_namespace() {
        let query = Query::find("blogs").cacheable_in("user_17");

        let opts = query.cache_options().expect("cache options missing");
        assert_eq!(opts.namespace(), "user_17");
    }

    #[test]
    fn test_with_filter_replaces_existing_fields() {
        let mut filter = Map::new();
        filter.insert("author".to_string(), "u2".into());

        let query = Query::find("blogs")
            .where_field("author", "u1")
            .where_field("published", true)
            .with_filter(filter);

        assert_eq!(query.filter().len(), 1);
        assert_eq!(query.filter()["author"], Value::String("u2".to_string()));
    }

    #[test]
    fn test_filter_accumulates_fields() {
        let query = Query::find("blogs")
            .where_field("author", "u1")
            .where_field("published", true);

        assert_eq!(query.filter().len(), 2);
        assert_eq!(query.filter()["published"], Value::Bool(true));
    }
}
