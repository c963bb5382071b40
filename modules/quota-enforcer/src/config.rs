//! Configuration for the quota enforcer module.

use serde::Deserialize;
use tenant_resolver::PlanTier;

use crate::limits::PlanLimits;

/// Module configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuotaConfig {
    /// Ceilings per tier and resource.
    pub limits: PlanLimits,
    /// Tier assumed for tenants with no recorded tier (conservative
    /// default: the smallest plan).
    pub default_tier: PlanTier,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            limits: PlanLimits::default(),
            default_tier: PlanTier::Starter,
        }
    }
}
