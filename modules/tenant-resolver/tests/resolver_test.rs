#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for tenant resolution and fail-closed validation.

use std::sync::Arc;

use complykit_security::{AuditKind, MemoryAuditLog, Principal};
use tenant_resolver::{
    InMemoryTenantDirectory, PlanTier, Tenant, TenantResolveError, TenantResolver,
    TenantResolverConfig, TenantStatus,
};
use uuid::Uuid;

fn resolver_with(
    directory: Arc<InMemoryTenantDirectory>,
    audit: Arc<MemoryAuditLog>,
) -> TenantResolver {
    TenantResolver::new(directory, audit, &TenantResolverConfig::default())
}

fn active_tenant(directory: &InMemoryTenantDirectory) -> Uuid {
    let id = Uuid::new_v4();
    directory.insert(Tenant::new(id, "Acme Compliance", PlanTier::Professional));
    id
}

#[tokio::test]
async fn member_resolves_to_home_tenant() {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    let tenant_id = active_tenant(&directory);
    let resolver = resolver_with(directory, Arc::new(MemoryAuditLog::new()));
    let principal = Principal::member(Uuid::new_v4(), tenant_id);

    let ctx = resolver
        .resolve_and_validate(&principal, None)
        .await
        .expect("member with an active home tenant must resolve");

    assert_eq!(ctx.tenant_id, tenant_id);
    assert_eq!(ctx.principal_id, principal.id);
}

#[tokio::test]
async fn member_cannot_override_via_header() {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    let home = active_tenant(&directory);
    let other = active_tenant(&directory);
    let resolver = resolver_with(directory, Arc::new(MemoryAuditLog::new()));
    let principal = Principal::member(Uuid::new_v4(), home);

    let ctx = resolver
        .resolve_and_validate(&principal, Some(&other.to_string()))
        .await
        .unwrap();

    // The header only counts for cross-tenant roles.
    assert_eq!(ctx.tenant_id, home);
}

#[tokio::test]
async fn platform_admin_uses_explicit_override() {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    let tenant_id = active_tenant(&directory);
    let resolver = resolver_with(directory, Arc::new(MemoryAuditLog::new()));
    let admin = Principal::platform_admin(Uuid::new_v4());

    let ctx = resolver
        .resolve_and_validate(&admin, Some(&tenant_id.to_string()))
        .await
        .unwrap();

    assert_eq!(ctx.tenant_id, tenant_id);
}

#[tokio::test]
async fn platform_admin_without_header_gets_no_tenant_context() {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    active_tenant(&directory);
    let resolver = resolver_with(directory, Arc::new(MemoryAuditLog::new()));
    let admin = Principal::platform_admin(Uuid::new_v4());

    let err = resolver.resolve_and_validate(&admin, None).await.unwrap_err();

    assert!(matches!(err, TenantResolveError::NoTenantContext { .. }));
}

#[tokio::test]
async fn unknown_tenant_is_invalid_and_audited() {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    let audit = Arc::new(MemoryAuditLog::new());
    let resolver = resolver_with(directory, audit.clone());
    let ghost = Uuid::new_v4();
    let admin = Principal::platform_admin(Uuid::new_v4());

    let err = resolver
        .resolve_and_validate(&admin, Some(&ghost.to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, TenantResolveError::InvalidTenant { .. }));
    let records = audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, AuditKind::ValidationFailed);
    assert_eq!(records[0].tenant_id, Some(ghost));
    assert_eq!(records[0].principal_id, Some(admin.id));
}

#[tokio::test]
async fn suspended_tenant_is_invalid() {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    let tenant_id = active_tenant(&directory);
    directory.set_status(tenant_id, TenantStatus::Suspended);
    let resolver = resolver_with(directory, Arc::new(MemoryAuditLog::new()));
    let principal = Principal::member(Uuid::new_v4(), tenant_id);

    let err = resolver
        .resolve_and_validate(&principal, None)
        .await
        .unwrap_err();

    assert!(matches!(err, TenantResolveError::InvalidTenant { .. }));
}

#[tokio::test]
async fn malformed_override_header_is_invalid() {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    let resolver = resolver_with(directory, Arc::new(MemoryAuditLog::new()));
    let admin = Principal::platform_admin(Uuid::new_v4());

    let err = resolver
        .resolve_and_validate(&admin, Some("not-a-uuid"))
        .await
        .unwrap_err();

    assert!(matches!(err, TenantResolveError::InvalidTenant { .. }));
}

#[tokio::test]
async fn directory_outage_fails_closed() {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    let tenant_id = active_tenant(&directory);
    let audit = Arc::new(MemoryAuditLog::new());
    let resolver = resolver_with(directory.clone(), audit.clone());
    let principal = Principal::member(Uuid::new_v4(), tenant_id);

    directory.set_unavailable(true);

    let err = resolver
        .resolve_and_validate(&principal, None)
        .await
        .unwrap_err();

    assert!(
        matches!(err, TenantResolveError::TenantValidationUnavailable),
        "an unreachable directory must never be treated as assume-valid"
    );
    assert_eq!(audit.records().len(), 1);
}

#[tokio::test]
async fn validation_cache_skips_directory_within_ttl() {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    let tenant_id = active_tenant(&directory);
    let resolver = resolver_with(directory.clone(), Arc::new(MemoryAuditLog::new()));
    let principal = Principal::member(Uuid::new_v4(), tenant_id);

    // Warm the validation cache.
    resolver
        .resolve_and_validate(&principal, None)
        .await
        .unwrap();

    // With the directory now down, the cached positive result still
    // serves within the TTL window.
    directory.set_unavailable(true);
    let ctx = resolver
        .resolve_and_validate(&principal, None)
        .await
        .expect("cached validation should serve during an outage");
    assert_eq!(ctx.tenant_id, tenant_id);

    // But an uncached tenant still fails closed.
    let stranger = Principal::member(Uuid::new_v4(), Uuid::new_v4());
    let err = resolver
        .resolve_and_validate(&stranger, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TenantResolveError::TenantValidationUnavailable));
}

#[tokio::test]
async fn expired_validation_entry_reconsults_the_directory() {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    let tenant_id = active_tenant(&directory);
    // Zero TTL: every cached validation is already expired on the next
    // request.
    let resolver = TenantResolver::new(
        directory.clone(),
        Arc::new(MemoryAuditLog::new()),
        &TenantResolverConfig {
            validation_ttl_secs: 0,
        },
    );
    let principal = Principal::member(Uuid::new_v4(), tenant_id);

    // Warm the cache, then re-resolve: the directory answers again and
    // the request still succeeds.
    resolver
        .resolve_and_validate(&principal, None)
        .await
        .unwrap();
    resolver
        .resolve_and_validate(&principal, None)
        .await
        .unwrap();

    // Suspend the tenant: the next request must see the change instead
    // of the expired cached yes.
    directory.set_status(tenant_id, TenantStatus::Suspended);
    let err = resolver
        .resolve_and_validate(&principal, None)
        .await
        .unwrap_err();
    assert!(matches!(err, TenantResolveError::InvalidTenant { .. }));

    // Reactivate, warm again, then take the directory down: the expired
    // entry must not serve, so validation fails closed.
    directory.set_status(tenant_id, TenantStatus::Active);
    resolver
        .resolve_and_validate(&principal, None)
        .await
        .unwrap();
    directory.set_unavailable(true);
    let err = resolver
        .resolve_and_validate(&principal, None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, TenantResolveError::TenantValidationUnavailable),
        "an expired cache entry must not serve during an outage"
    );
}
