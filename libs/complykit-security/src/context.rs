//! Request-scoped tenant context.
//!
//! The process serves many tenants concurrently, so "which tenant is this
//! operation for" must never live in shared mutable state. The binding is
//! a tokio task-local: [`bind`] scopes a context to one logical request's
//! future, and [`current`] reads it from anywhere below that future
//! without explicit threading through every call.
//!
//! The task-local scope is also the cleanup mechanism: when the bound
//! future completes, fails, or is cancelled, the binding is gone. There is
//! no code path that leaves a stale context visible to a reused worker
//! thread.

use std::future::Future;

use uuid::Uuid;

/// The resolved tenant binding for the current operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: Uuid,
    pub principal_id: Uuid,
}

impl TenantContext {
    #[must_use]
    pub fn new(tenant_id: Uuid, principal_id: Uuid) -> Self {
        Self {
            tenant_id,
            principal_id,
        }
    }
}

tokio::task_local! {
    static TENANT_CONTEXT: TenantContext;
}

/// Run `fut` with `ctx` observable through [`current`].
///
/// The binding holds across every `.await` inside `fut` and is dropped
/// unconditionally when `fut` finishes (success, error, or cancellation).
/// Nested binds shadow the outer context for the inner scope only.
pub async fn bind<F>(ctx: TenantContext, fut: F) -> F::Output
where
    F: Future,
{
    TENANT_CONTEXT.scope(ctx, fut).await
}

/// The tenant context bound to the current task, if any.
///
/// Outside a [`bind`] scope this returns `None` - never a value left over
/// from a previous request.
#[must_use]
pub fn current() -> Option<TenantContext> {
    TENANT_CONTEXT.try_with(|ctx| *ctx).ok()
}

/// Shorthand for the bound tenant id.
#[must_use]
pub fn current_tenant() -> Option<Uuid> {
    current().map(|ctx| ctx.tenant_id)
}
