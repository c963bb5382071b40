//! Tenant directory port and the bundled in-memory implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use super::model::{Tenant, TenantStatus};

/// Directory lookup failure. Lookup errors are availability problems, not
/// "tenant missing" - a missing tenant is `Ok(None)`.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("tenant directory unavailable: {0}")]
    Unavailable(String),
}

/// Read port over the tenant directory.
///
/// The resolver only needs point lookups; provisioning and admin
/// mutations belong to whichever implementation backs this trait.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Look up a tenant by id.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Unavailable`] when the directory store
    /// cannot be consulted at all.
    async fn get(&self, id: Uuid) -> Result<Option<Tenant>, DirectoryError>;
}

/// In-process tenant directory.
///
/// Serves as the provisioning surface in tests and single-node setups.
/// The `unavailable` toggle simulates a directory-store outage so the
/// fail-closed path stays covered.
#[derive(Default)]
pub struct InMemoryTenantDirectory {
    tenants: DashMap<Uuid, Tenant>,
    unavailable: std::sync::atomic::AtomicBool,
}

impl InMemoryTenantDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision (or replace) a tenant record.
    pub fn insert(&self, tenant: Tenant) {
        self.tenants.insert(tenant.id, tenant);
    }

    /// Admin operation: flip a tenant's lifecycle status. Returns false
    /// when the tenant does not exist.
    pub fn set_status(&self, id: Uuid, status: TenantStatus) -> bool {
        match self.tenants.get_mut(&id) {
            Some(mut tenant) => {
                tenant.status = status;
                true
            }
            None => false,
        }
    }

    /// Simulate a directory outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable
            .store(unavailable, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl TenantDirectory for InMemoryTenantDirectory {
    async fn get(&self, id: Uuid) -> Result<Option<Tenant>, DirectoryError> {
        if self.unavailable.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable("simulated outage".to_owned()));
        }
        Ok(self.tenants.get(&id).map(|tenant| tenant.value().clone()))
    }
}
