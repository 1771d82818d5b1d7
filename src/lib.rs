//! # query-cache
//!
//! A transparent, opt-in result cache for document-store queries.
//!
//! Sits between an application's data-access layer and its backing
//! document store. Queries that opt in are served from a fast key-value
//! store when a previous result is available; otherwise the live query
//! runs, its result is cached with a TTL, and the caller gets it back
//! unchanged. A post-request invalidation hook clears an owner's whole
//! cache namespace after mutations.
//!
//! ## Features
//!
//! - **Opt-in and transparent:** unmarked queries never touch the cache;
//!   marked ones return results indistinguishable from live execution
//! - **Explicit composition:** the interceptor decorates your executor
//!   at the call site, nothing global is patched
//! - **Shape faithful:** single and collection results round-trip
//!   through a tagged payload, never guessed from structure
//! - **Fail open:** every cache-path failure degrades to the live
//!   source; only live-execution errors reach callers
//! - **Backend agnostic:** in-memory store built in, Redis behind the
//!   `redis` feature, or implement [`CacheStore`] yourself
//!
//! ## Quick Start
//!
//! ```ignore
//! use query_cache::{Query, QueryInterceptor, CacheInvalidator, store::InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! let interceptor = QueryInterceptor::new(store.clone());
//! let invalidator = CacheInvalidator::new(store);
//!
//! // Read path: opt in, then execute as usual.
//! let query = Query::find("blogs")
//!     .where_field("author", &user.id)
//!     .cacheable_in(&user.id);
//! let blogs: QueryResult<Blog> = interceptor.execute(&query, &executor).await?;
//!
//! // Write path: wrap the handler; the owner's namespace is cleared
//! // after it completes.
//! let response = invalidator.run(&user.id, || create_blog(request)).await;
//! ```

#[macro_use]
extern crate log;

pub mod builder;
pub mod error;
pub mod executor;
pub mod interceptor;
pub mod invalidate;
pub mod key;
pub mod observability;
pub mod query;
pub mod record;
pub mod result;
pub mod store;

// Re-exports for convenience
pub use builder::ExecutionBuilder;
pub use error::{Error, Result};
pub use executor::QueryExecutor;
pub use interceptor::QueryInterceptor;
pub use invalidate::CacheInvalidator;
pub use key::QueryKeyBuilder;
pub use query::{Query, ResultShape};
pub use record::Record;
pub use result::QueryResult;
pub use store::CacheStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
