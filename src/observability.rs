//! Metrics hooks and TTL policy.

use std::time::Duration;

/// TTL applied to cache entries unless overridden.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

/// Hooks for recording cache behavior. All methods default to no-ops, so
/// implementors only override what they care about.
pub trait CacheMetrics: Send + Sync {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// Default metrics handler that records nothing.
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {}

/// Expiration policy for populated cache entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtlPolicy {
    /// Every entry expires after the same fixed duration.
    Fixed(Duration),
    /// Entries never expire on their own; only invalidation removes them.
    Forever,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        TtlPolicy::Fixed(DEFAULT_TTL)
    }
}

impl TtlPolicy {
    /// TTL to apply when populating an entry for the given collection.
    pub fn get_ttl(&self, _collection: &str) -> Option<Duration> {
        match self {
            TtlPolicy::Fixed(duration) => Some(*duration),
            TtlPolicy::Forever => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_ten_seconds() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.get_ttl("blogs"), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_forever_policy_has_no_ttl() {
        assert_eq!(TtlPolicy::Forever.get_ttl("blogs"), None);
    }
}
