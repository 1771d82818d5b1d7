//! Error types for the caching layer.

use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the caching layer.
///
/// Cache-path failures (store round-trips, payload encoding) are handled
/// inside the interceptor and normally never reach callers; the variants
/// here exist so adapters and the live execution seam can report precisely
/// what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A result could not be serialized into a cache payload.
    SerializationError(String),
    /// A cached payload could not be deserialized back into a result.
    DeserializationError(String),
    /// The cache store is unavailable or a round-trip failed.
    StoreError(String),
    /// The live query execution path failed.
    ExecutorError(String),
    /// Invalid adapter or store configuration.
    ConfigError(String),
    /// A bounded cache-store round-trip exceeded its deadline.
    Timeout(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "deserialization error: {}", msg),
            Error::StoreError(msg) => write!(f, "cache store error: {}", msg),
            Error::ExecutorError(msg) => write!(f, "executor error: {}", msg),
            Error::ConfigError(msg) => write!(f, "config error: {}", msg),
            Error::Timeout(msg) => write!(f, "timeout: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
