//! Cache store trait.

use async_trait::async_trait;
use shaku::Interface;
use sightline_core::SightlineResult;
use std::time::Duration;

/// Outcome of a cache read. An absent key is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// The key holds this value.
    Hit(String),
    /// The key is absent or expired.
    Miss,
}

impl CacheLookup {
    /// Returns the value on a hit.
    #[must_use]
    pub fn into_value(self) -> Option<String> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss => None,
        }
    }

    /// Returns true on a hit.
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

impl From<Option<String>> for CacheLookup {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Miss, Self::Hit)
    }
}

/// Key/value access to the remote cache.
///
/// Values are opaque strings. Every call fails with
/// `SightlineError::CacheUnavailable` when no connection pool was established.
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Reads a key.
    async fn get(&self, key: &str) -> SightlineResult<CacheLookup>;

    /// Writes a key, expiring it after `ttl` (rounded up to at least one
    /// second) when given.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> SightlineResult<()>;

    /// Removes a key, returning the number of keys removed (0 or 1).
    async fn delete(&self, key: &str) -> SightlineResult<u64>;

    /// Checks whether a key is present.
    async fn exists(&self, key: &str) -> SightlineResult<bool>;

    /// Round-trips a PING to the server.
    async fn ping(&self) -> SightlineResult<()>;
}
