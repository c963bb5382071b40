//! Tenant resolution and validation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use complykit_security::{AuditKind, AuditRecord, AuditSink, Principal, TenantContext};
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::config::TenantResolverConfig;

use super::directory::{DirectoryError, TenantDirectory};

/// Resolution failures. All of these surface to the caller as an
/// authorization-class rejection; none may be silently swallowed.
#[derive(Debug, Error)]
pub enum TenantResolveError {
    /// The principal has neither a home tenant nor a usable override.
    #[error("no tenant context for principal {principal_id}")]
    NoTenantContext { principal_id: Uuid },

    /// The resolved tenant does not exist or is not active.
    #[error("invalid tenant: {tenant}")]
    InvalidTenant { tenant: String },

    /// The tenant directory could not be consulted. Never treated as
    /// "assume valid".
    #[error("tenant validation unavailable")]
    TenantValidationUnavailable,
}

/// Resolves the effective tenant for a request and validates it against
/// the tenant directory.
///
/// Positive validations are cached per tenant id with a short TTL.
/// Validation is a security check, so the cache fails closed: a miss plus
/// a directory outage rejects the request instead of letting the tenant
/// through (contrast the data cache, which fails open).
pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
    audit: Arc<dyn AuditSink>,
    validated: DashMap<Uuid, Instant>,
    ttl: Duration,
}

impl TenantResolver {
    #[must_use]
    pub fn new(
        directory: Arc<dyn TenantDirectory>,
        audit: Arc<dyn AuditSink>,
        config: &TenantResolverConfig,
    ) -> Self {
        Self {
            directory,
            audit,
            validated: DashMap::new(),
            ttl: Duration::from_secs(config.validation_ttl_secs),
        }
    }

    /// Determine the effective tenant id without touching the directory.
    ///
    /// Cross-tenant principals may override via the `x-tenant-id` header;
    /// everyone else gets their home tenant. The override header is
    /// ignored for tenant-scoped roles - a member cannot hop tenants by
    /// setting a header.
    ///
    /// # Errors
    /// - [`TenantResolveError::InvalidTenant`] for a malformed override value.
    /// - [`TenantResolveError::NoTenantContext`] when nothing identifies a tenant.
    pub fn resolve(
        &self,
        principal: &Principal,
        explicit_tenant_header: Option<&str>,
    ) -> Result<Uuid, TenantResolveError> {
        if principal.role.is_cross_tenant() {
            if let Some(raw) = explicit_tenant_header {
                return Uuid::parse_str(raw.trim()).map_err(|_| {
                    TenantResolveError::InvalidTenant {
                        tenant: raw.to_owned(),
                    }
                });
            }
        }
        if let Some(home) = principal.home_tenant {
            return Ok(home);
        }
        Err(TenantResolveError::NoTenantContext {
            principal_id: principal.id,
        })
    }

    /// Resolve, validate against the directory, and produce the context
    /// ready for [`complykit_security::bind`].
    ///
    /// # Errors
    /// Everything [`TenantResolver::resolve`] returns, plus
    /// [`TenantResolveError::InvalidTenant`] for unknown or inactive
    /// tenants and [`TenantResolveError::TenantValidationUnavailable`]
    /// when the directory is down.
    pub async fn resolve_and_validate(
        &self,
        principal: &Principal,
        explicit_tenant_header: Option<&str>,
    ) -> Result<TenantContext, TenantResolveError> {
        let tenant_id = self.resolve(principal, explicit_tenant_header)?;
        self.validate(tenant_id, principal).await?;

        self.audit.record(
            AuditRecord::new(AuditKind::ContextResolved, Some(tenant_id))
                .principal(principal.id),
        );
        Ok(TenantContext::new(tenant_id, principal.id))
    }

    /// Validate a tenant id against the cache, then the directory.
    async fn validate(
        &self,
        tenant_id: Uuid,
        principal: &Principal,
    ) -> Result<(), TenantResolveError> {
        if let Some(validated_at) = self.validated.get(&tenant_id) {
            if validated_at.elapsed() < self.ttl {
                tracing::trace!(%tenant_id, "tenant validation cache hit");
                return Ok(());
            }
        }

        match self.directory.get(tenant_id).await {
            Ok(Some(tenant)) if tenant.status.is_active() => {
                self.validated.insert(tenant_id, Instant::now());
                Ok(())
            }
            Ok(Some(tenant)) => {
                self.reject(
                    tenant_id,
                    principal,
                    format!("tenant is {}", tenant.status.as_str()),
                );
                Err(TenantResolveError::InvalidTenant {
                    tenant: tenant_id.to_string(),
                })
            }
            Ok(None) => {
                self.reject(tenant_id, principal, "tenant does not exist".to_owned());
                Err(TenantResolveError::InvalidTenant {
                    tenant: tenant_id.to_string(),
                })
            }
            Err(DirectoryError::Unavailable(detail)) => {
                // Expired cache entries do not count: without a reachable
                // directory we refuse rather than serve a stale yes.
                tracing::error!(%tenant_id, %detail, "tenant directory unavailable, failing closed");
                self.audit.record(
                    AuditRecord::new(AuditKind::ValidationFailed, Some(tenant_id))
                        .principal(principal.id)
                        .reason(format!("directory unavailable: {detail}")),
                );
                Err(TenantResolveError::TenantValidationUnavailable)
            }
        }
    }

    fn reject(&self, tenant_id: Uuid, principal: &Principal, reason: String) {
        tracing::warn!(%tenant_id, principal_id = %principal.id, %reason, "tenant validation rejected");
        self.audit.record(
            AuditRecord::new(AuditKind::ValidationFailed, Some(tenant_id))
                .principal(principal.id)
                .reason(reason),
        );
    }
}
