//! Tenant directory records.

use uuid::Uuid;

/// Subscription tier, consumed by the quota enforcer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Starter,
    Professional,
    Enterprise,
}

/// Lifecycle status. Tenants are never hard-deleted; deactivation flips
/// the status and data is retained per retention policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Active,
    Suspended,
    Canceled,
}

impl TenantStatus {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, TenantStatus::Active)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Suspended => "suspended",
            TenantStatus::Canceled => "canceled",
        }
    }
}

/// Single-sign-on settings. Opaque to this core; owned by the auth stack.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SsoConfig {
    pub issuer: String,
    pub audience: String,
}

/// A platform customer whose data must be isolated from everyone else's.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub tier: PlanTier,
    pub status: TenantStatus,
    pub sso: Option<SsoConfig>,
}

impl Tenant {
    /// A freshly provisioned, active tenant.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>, tier: PlanTier) -> Self {
        Self {
            id,
            name: name.into(),
            tier,
            status: TenantStatus::Active,
            sso: None,
        }
    }
}
