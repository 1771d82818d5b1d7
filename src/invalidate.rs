//! Post-request invalidation hook.
//!
//! Mutations make an owner's cached reads stale. The hook is an explicit
//! two-phase pipeline: run the request handler to completion, then clear
//! every cache entry under the owner's namespace. Subsequent reads are
//! forced back to the live source.

use crate::error::Result;
use crate::store::CacheStore;
use std::future::Future;

/// Clears an owner's cache namespace after a request handler finishes.
///
/// Wraps one cache store connection; share it alongside the interceptor.
///
/// # Example
///
/// ```ignore
/// let response = invalidator
///     .run(&user.id, || handle_create_blog(request))
///     .await;
/// // every cache entry under user.id is gone here
/// ```
pub struct CacheInvalidator<S: CacheStore> {
    store: S,
}

impl<S: CacheStore> CacheInvalidator<S> {
    pub fn new(store: S) -> Self {
        CacheInvalidator { store }
    }

    /// Run `handler` to completion, then delete the owner's namespace.
    ///
    /// The handler's effects (including writes to the backing store) are
    /// fully applied before invalidation starts, and invalidation
    /// completes before this returns, so later requests observe it. An
    /// invalidation failure is logged and never alters the handler's
    /// outcome; stale entries then persist until their TTL expires.
    pub async fn run<F, Fut, R>(&self, owner_id: &str, handler: F) -> R
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = R>,
    {
        let response = handler().await;

        if let Err(e) = self.store.delete_namespace(owner_id).await {
            warn!("cache invalidation failed for namespace {}: {}", owner_id, e);
        } else {
            debug!("✓ invalidated cache namespace {}", owner_id);
        }

        response
    }

    /// Clear an owner's namespace directly, outside a request pipeline.
    ///
    /// # Errors
    /// Returns `Err` if the store round-trip fails.
    pub async fn clear_namespace(&self, owner_id: &str) -> Result<()> {
        self.store.delete_namespace(owner_id).await
    }
}
