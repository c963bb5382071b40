//! Resource kinds and per-tier ceilings.

use tenant_resolver::PlanTier;

/// Countable resource kinds, one per tenant-scoped entity type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Station,
    Contractor,
    AuditRun,
    FormTemplate,
    Incident,
    Permit,
}

impl ResourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Station => "station",
            ResourceKind::Contractor => "contractor",
            ResourceKind::AuditRun => "audit_run",
            ResourceKind::FormTemplate => "form_template",
            ResourceKind::Incident => "incident",
            ResourceKind::Permit => "permit",
        }
    }
}

/// Per-tier ceilings. `None` means unlimited.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanLimits {
    pub starter: TierLimits,
    pub professional: TierLimits,
}

/// Ceilings within one tier. Enterprise has no ceilings at all, so it
/// carries no entry here.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TierLimits {
    pub stations: u64,
    pub contractors: u64,
    pub audit_runs: u64,
    pub form_templates: u64,
    pub incidents: u64,
    pub permits: u64,
}

impl TierLimits {
    fn limit_for(self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Station => self.stations,
            ResourceKind::Contractor => self.contractors,
            ResourceKind::AuditRun => self.audit_runs,
            ResourceKind::FormTemplate => self.form_templates,
            ResourceKind::Incident => self.incidents,
            ResourceKind::Permit => self.permits,
        }
    }
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            stations: 10,
            contractors: 25,
            audit_runs: 100,
            form_templates: 20,
            incidents: 200,
            permits: 50,
        }
    }
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            starter: TierLimits::default(),
            professional: TierLimits {
                stations: 100,
                contractors: 500,
                audit_runs: 5_000,
                form_templates: 200,
                incidents: 10_000,
                permits: 2_000,
            },
        }
    }
}

impl PlanLimits {
    /// Ceiling for one tier and resource. `None` is unlimited.
    #[must_use]
    pub fn limit_for(&self, tier: PlanTier, kind: ResourceKind) -> Option<u64> {
        match tier {
            PlanTier::Starter => Some(self.starter.limit_for(kind)),
            PlanTier::Professional => Some(self.professional.limit_for(kind)),
            PlanTier::Enterprise => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered_and_enterprise_is_unlimited() {
        let limits = PlanLimits::default();
        for kind in [
            ResourceKind::Station,
            ResourceKind::Contractor,
            ResourceKind::AuditRun,
            ResourceKind::FormTemplate,
            ResourceKind::Incident,
            ResourceKind::Permit,
        ] {
            let starter = limits.limit_for(PlanTier::Starter, kind);
            let pro = limits.limit_for(PlanTier::Professional, kind);
            assert!(starter < pro, "{} starter must be below professional", kind.as_str());
            assert_eq!(limits.limit_for(PlanTier::Enterprise, kind), None);
        }
    }
}
