//! The module's public surface: one scoped repository per entity type.

use std::sync::Arc;
use std::time::Duration;

use complykit_cache::{InMemoryCacheBackend, TenantCache};
use complykit_security::AuditSink;
use quota_enforcer::QuotaEnforcer;

use crate::config::StoreConfig;
use crate::domain::entity::{AuditRun, Contractor, FormTemplate, Incident, Permit, Station};
use crate::domain::repo::ScopedRepo;
use crate::infra::memory::InMemoryTable;

/// All six scoped repositories, sharing one cache, one quota gate, and
/// one audit sink. There is no escape hatch to the raw tables.
#[derive(Clone)]
pub struct ComplianceStore {
    pub stations: ScopedRepo<Station>,
    pub contractors: ScopedRepo<Contractor>,
    pub audit_runs: ScopedRepo<AuditRun>,
    pub form_templates: ScopedRepo<FormTemplate>,
    pub incidents: ScopedRepo<Incident>,
    pub permits: ScopedRepo<Permit>,
}

impl ComplianceStore {
    /// Fully in-memory store: per-entity [`InMemoryTable`]s behind a
    /// fresh in-memory cache. The default for tests and single-node runs.
    #[must_use]
    pub fn in_memory(
        config: &StoreConfig,
        quota: Arc<QuotaEnforcer>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let backend = Arc::new(InMemoryCacheBackend::new());
        let cache = TenantCache::new(backend)
            .with_default_ttl(Duration::from_secs(config.cache_ttl_secs));
        Self::with_cache(config, cache, quota, audit)
    }

    /// In-memory tables behind a caller-provided cache, for wiring a
    /// shared or fault-injectable cache backend.
    #[must_use]
    pub fn with_cache(
        config: &StoreConfig,
        cache: TenantCache,
        quota: Arc<QuotaEnforcer>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let limits = config.limits();
        Self {
            stations: ScopedRepo::new(
                Arc::new(InMemoryTable::new()),
                cache.clone(),
                quota.clone(),
                audit.clone(),
                limits,
            ),
            contractors: ScopedRepo::new(
                Arc::new(InMemoryTable::new()),
                cache.clone(),
                quota.clone(),
                audit.clone(),
                limits,
            ),
            audit_runs: ScopedRepo::new(
                Arc::new(InMemoryTable::new()),
                cache.clone(),
                quota.clone(),
                audit.clone(),
                limits,
            ),
            form_templates: ScopedRepo::new(
                Arc::new(InMemoryTable::new()),
                cache.clone(),
                quota.clone(),
                audit.clone(),
                limits,
            ),
            incidents: ScopedRepo::new(
                Arc::new(InMemoryTable::new()),
                cache.clone(),
                quota.clone(),
                audit.clone(),
                limits,
            ),
            permits: ScopedRepo::new(
                Arc::new(InMemoryTable::new()),
                cache,
                quota,
                audit,
                limits,
            ),
        }
    }
}
