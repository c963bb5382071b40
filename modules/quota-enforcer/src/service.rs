//! Quota checks and usage accounting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use complykit_security::{AuditKind, AuditRecord, AuditSink};
use dashmap::DashMap;
use tenant_resolver::PlanTier;
use uuid::Uuid;

use crate::config::QuotaConfig;
use crate::limits::{PlanLimits, ResourceKind};

/// Outcome of a quota check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuotaDecision {
    Allow,
    Deny { reason: String },
}

impl QuotaDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, QuotaDecision::Allow)
    }
}

/// Plan-quota gate consulted before every tenant-scoped create.
///
/// Holds the tier registry (populated at tenant provisioning) and the
/// per-tenant usage counters. Counters only move on confirmed store
/// operations: [`QuotaEnforcer::record_create`] after a successful
/// insert, [`QuotaEnforcer::record_delete`] after a successful delete.
pub struct QuotaEnforcer {
    limits: PlanLimits,
    default_tier: PlanTier,
    tiers: DashMap<Uuid, PlanTier>,
    usage: DashMap<(Uuid, ResourceKind), AtomicU64>,
    audit: Arc<dyn AuditSink>,
}

impl QuotaEnforcer {
    #[must_use]
    pub fn new(config: QuotaConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            limits: config.limits,
            default_tier: config.default_tier,
            tiers: DashMap::new(),
            usage: DashMap::new(),
            audit,
        }
    }

    /// Record a tenant's subscription tier (provisioning / plan change).
    pub fn set_tier(&self, tenant_id: Uuid, tier: PlanTier) {
        self.tiers.insert(tenant_id, tier);
    }

    fn tier_of(&self, tenant_id: Uuid) -> PlanTier {
        self.tiers
            .get(&tenant_id)
            .map_or(self.default_tier, |tier| *tier)
    }

    /// Current recorded usage for one tenant and resource.
    #[must_use]
    pub fn current(&self, tenant_id: Uuid, kind: ResourceKind) -> u64 {
        self.usage
            .get(&(tenant_id, kind))
            .map_or(0, |counter| counter.load(Ordering::SeqCst))
    }

    /// Decide whether one more `kind` may be created for `tenant_id`.
    ///
    /// A denial is recoverable and user-visible; it is audited but does
    /// not touch the counters.
    #[must_use]
    pub fn check(&self, tenant_id: Uuid, kind: ResourceKind) -> QuotaDecision {
        let tier = self.tier_of(tenant_id);
        let Some(limit) = self.limits.limit_for(tier, kind) else {
            return QuotaDecision::Allow;
        };
        let used = self.current(tenant_id, kind);
        if used < limit {
            return QuotaDecision::Allow;
        }

        let reason = format!(
            "plan limit reached for {}: {used}/{limit}",
            kind.as_str()
        );
        tracing::info!(%tenant_id, resource = kind.as_str(), used, limit, "quota denied");
        self.audit.record(
            AuditRecord::new(AuditKind::QuotaDenied, Some(tenant_id))
                .entity(kind.as_str())
                .reason(reason.clone()),
        );
        QuotaDecision::Deny { reason }
    }

    /// Account for a create that the store confirmed. Atomic relative to
    /// concurrent creates for the same tenant.
    pub fn record_create(&self, tenant_id: Uuid, kind: ResourceKind) {
        self.usage
            .entry((tenant_id, kind))
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::SeqCst);
    }

    /// Account for a confirmed delete. Saturates at zero.
    pub fn record_delete(&self, tenant_id: Uuid, kind: ResourceKind) {
        if let Some(counter) = self.usage.get(&(tenant_id, kind)) {
            let _ = counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                used.checked_sub(1)
            });
        }
    }
}
