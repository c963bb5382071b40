//! Key-value cache backends.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

/// Backend failure. The layer above recovers from these locally; they are
/// never surfaced to request handlers.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// A shared key-value store with per-entry TTL.
///
/// Values travel as `serde_json::Value`; typed (de)serialization happens
/// in [`crate::TenantCache`]. All operations must be safe under concurrent
/// access with per-key atomicity.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetch an unexpired entry.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError>;

    /// Store an entry, replacing any previous value for the key.
    async fn set(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Drop a single entry. Removing a missing key is a no-op.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Drop every entry whose key matches the glob pattern. Returns the
    /// number of entries removed.
    async fn remove_matching(&self, pattern: &glob::Pattern) -> Result<u64, CacheError>;
}

struct Entry {
    value: serde_json::Value,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Process-local cache backend over a concurrent map.
///
/// Expiry is lazy: entries are dropped when a read finds them stale or a
/// pattern sweep visits them. The `unavailable` toggle simulates backend
/// outage so the fail-open path stays tested.
#[derive(Default)]
pub struct InMemoryCacheBackend {
    entries: DashMap<String, Entry>,
    unavailable: std::sync::atomic::AtomicBool,
}

impl InMemoryCacheBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate backend outage (tests only in practice).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable
            .store(unavailable, std::sync::atomic::Ordering::SeqCst);
    }

    /// Number of live (possibly expired, not yet swept) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.unavailable.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(CacheError::Unavailable("simulated outage".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError> {
        self.check_available()?;
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return Ok(Some(entry.value.clone()));
            }
        }
        // Sweep the stale entry outside the read guard.
        self.entries.remove_if(key, |_, entry| entry.is_expired());
        Ok(None)
    }

    async fn set(
        &self,
        key: &str,
        value: serde_json::Value,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.check_available()?;
        self.entries.insert(
            key.to_owned(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }

    async fn remove_matching(&self, pattern: &glob::Pattern) -> Result<u64, CacheError> {
        self.check_available()?;
        let before = self.entries.len();
        self.entries
            .retain(|key, entry| !entry.is_expired() && !pattern.matches(key));
        Ok(before.saturating_sub(self.entries.len()) as u64)
    }
}
