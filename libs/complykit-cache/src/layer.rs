//! Read-through cache layer with tenant-partitioned keys.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::backend::{CacheBackend, CacheError};
use crate::DEFAULT_TTL_SECS;

/// Typed facade over a [`CacheBackend`].
///
/// Every method recovers from backend failure locally: a broken cache
/// reads as a miss and writes as a no-op, with a `warn` log. Callers get
/// slower, never wrong.
#[derive(Clone)]
pub struct TenantCache {
    backend: Arc<dyn CacheBackend>,
    default_ttl: Duration,
}

impl TenantCache {
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            default_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
        }
    }

    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Build a tenant-partitioned key: `tenant:{tenant_id}:{resource}:{suffix}`.
    #[must_use]
    pub fn key(tenant_id: Uuid, resource: &str, suffix: &str) -> String {
        format!("tenant:{tenant_id}:{resource}:{suffix}")
    }

    /// Glob matching every key of one tenant+resource namespace.
    #[must_use]
    pub fn namespace_pattern(tenant_id: Uuid, resource: &str) -> String {
        format!("tenant:{tenant_id}:{resource}:*")
    }

    /// Fetch and deserialize an entry. Any backend or decode problem reads
    /// as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.backend.get(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    tracing::warn!(key, error = %err, "cache entry failed to decode, treating as miss");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                self.warn_degraded("get", key, &err);
                None
            }
        }
    }

    /// Serialize and store an entry under `ttl` (default TTL when `None`).
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let encoded = match serde_json::to_value(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(key, error = %err, "value not cacheable, skipping");
                return;
            }
        };
        let ttl = ttl.unwrap_or(self.default_ttl);
        if let Err(err) = self.backend.set(key, encoded, ttl).await {
            self.warn_degraded("set", key, &err);
        }
    }

    /// Standard read-through: cached value if present, otherwise run
    /// `fetch`, cache its result, and return it. `fetch` errors propagate
    /// untouched; cache trouble never does.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get::<T>(key).await {
            tracing::trace!(key, "cache hit");
            return Ok(hit);
        }
        let fetched = fetch().await?;
        self.set(key, &fetched, ttl).await;
        Ok(fetched)
    }

    /// Drop one entry. Invalidating a missing key is a no-op.
    pub async fn invalidate(&self, key: &str) {
        if let Err(err) = self.backend.remove(key).await {
            self.warn_degraded("invalidate", key, &err);
        }
    }

    /// Drop every entry matching a glob, e.g.
    /// `tenant:{tenant_id}:station:*`. Returns how many entries went away.
    pub async fn invalidate_pattern(&self, pattern: &str) -> u64 {
        let compiled = match glob::Pattern::new(pattern) {
            Ok(compiled) => compiled,
            Err(err) => {
                tracing::warn!(pattern, error = %err, "invalid cache invalidation pattern");
                return 0;
            }
        };
        match self.backend.remove_matching(&compiled).await {
            Ok(removed) => removed,
            Err(err) => {
                self.warn_degraded("invalidate_pattern", pattern, &err);
                0
            }
        }
    }

    fn warn_degraded(&self, op: &'static str, key: &str, err: &CacheError) {
        tracing::warn!(op, key, error = %err, "cache degraded, continuing without it");
    }
}
