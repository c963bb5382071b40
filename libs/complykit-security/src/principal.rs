//! Authenticated principals.
//!
//! Authentication itself happens upstream; this crate only consumes the
//! verified result: who is calling, with which role, and which tenant
//! (if any) they belong to.

use uuid::Uuid;

/// Role attached to a principal.
///
/// `Member` and `TenantAdmin` are tenant-scoped roles; `PlatformAdmin`
/// is the only cross-tenant role and may select a tenant per request via
/// the explicit `x-tenant-id` override header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    TenantAdmin,
    PlatformAdmin,
}

impl Role {
    /// Whether this role may operate across tenants.
    #[must_use]
    pub fn is_cross_tenant(self) -> bool {
        matches!(self, Role::PlatformAdmin)
    }
}

/// The authenticated actor for a request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    /// Home tenant of the principal. `None` for platform admins, which
    /// have no tenant of their own.
    pub home_tenant: Option<Uuid>,
}

impl Principal {
    /// A regular tenant member.
    #[must_use]
    pub fn member(id: Uuid, home_tenant: Uuid) -> Self {
        Self {
            id,
            role: Role::Member,
            home_tenant: Some(home_tenant),
        }
    }

    /// A tenant-scoped administrator.
    #[must_use]
    pub fn tenant_admin(id: Uuid, home_tenant: Uuid) -> Self {
        Self {
            id,
            role: Role::TenantAdmin,
            home_tenant: Some(home_tenant),
        }
    }

    /// A cross-tenant platform administrator with no home tenant.
    #[must_use]
    pub fn platform_admin(id: Uuid) -> Self {
        Self {
            id,
            role: Role::PlatformAdmin,
            home_tenant: None,
        }
    }
}
