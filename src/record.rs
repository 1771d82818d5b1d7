//! Typed record bound for documents flowing through the cache.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Bound for typed documents that can round-trip through the cache.
///
/// Blanket-implemented for any serde-capable `Clone` type, so callers
/// keep using their existing document structs unchanged.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {}

impl<T> Record for T where T: Serialize + DeserializeOwned + Clone + Send + Sync {}
