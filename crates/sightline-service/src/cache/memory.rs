//! In-memory cache store for tests.

use super::{CacheLookup, CacheStore};
use async_trait::async_trait;
use sightline_core::{SightlineError, SightlineResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// A recorded `set` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    pub key: String,
    pub value: String,
    pub ttl: Option<Duration>,
}

/// In-memory [`CacheStore`] with Tokio-clock expiry.
///
/// Expiry follows `tokio::time`, so tests can use a paused clock.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, (String, Option<Instant>)>>,
    writes: Mutex<Vec<RecordedWrite>>,
    unavailable: AtomicBool,
    failing_writes: AtomicBool,
}

impl InMemoryCacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail with `CacheUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes `set` fail with a command error while reads keep working.
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    /// Returns every accepted `set` call in order.
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// Stores a value directly, bypassing write recording.
    pub fn seed(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), (value.to_string(), None));
        }
    }

    fn check_available(&self) -> SightlineResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SightlineError::CacheUnavailable("cache is disconnected".to_string()));
        }
        Ok(())
    }

    fn entries(&self) -> SightlineResult<std::sync::MutexGuard<'_, HashMap<String, (String, Option<Instant>)>>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| SightlineError::Cache("cache lock poisoned".to_string()))?;
        let now = Instant::now();
        entries.retain(|_, (_, expires_at)| expires_at.map_or(true, |at| at > now));
        Ok(entries)
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> SightlineResult<CacheLookup> {
        self.check_available()?;
        Ok(self.entries()?.get(key).map(|(value, _)| value.clone()).into())
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> SightlineResult<()> {
        self.check_available()?;
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(SightlineError::Cache(format!("Failed to set key '{}': READONLY", key)));
        }

        let expires_at = ttl.map(|ttl| Instant::now() + Duration::from_secs(ttl.as_secs().max(1)));
        self.entries()?
            .insert(key.to_string(), (value.to_string(), expires_at));
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(RecordedWrite {
                key: key.to_string(),
                value: value.to_string(),
                ttl,
            });
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> SightlineResult<u64> {
        self.check_available()?;
        Ok(u64::from(self.entries()?.remove(key).is_some()))
    }

    async fn exists(&self, key: &str) -> SightlineResult<bool> {
        self.check_available()?;
        Ok(self.entries()?.contains_key(key))
    }

    async fn ping(&self) -> SightlineResult<()> {
        self.check_available()
    }
}
