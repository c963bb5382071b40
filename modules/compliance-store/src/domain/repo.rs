//! The interception point for all tenant-scoped data access.
//!
//! A [`ScopedRepo`] never asks its caller which tenant it is working for.
//! It reads the binding from task-local storage on every operation:
//! reads with no binding come back empty, mutations with no binding are
//! refused. The backing [`RecordStore`] stays tenant-oblivious; filtering
//! and injection happen here and only here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use complykit_cache::TenantCache;
use complykit_paging::{slice_page, Cursor, LimitCfg, Page, PageError, SortDir};
use complykit_security::{context, AuditKind, AuditRecord, AuditSink};
use quota_enforcer::{QuotaDecision, QuotaEnforcer};
use uuid::Uuid;

use crate::domain::entity::ScopedEntity;
use crate::domain::error::StoreError;

/// Canonical list ordering: newest first, id as tiebreaker.
pub const ORDER_TOKENS: &str = "-created_at,-id";

/// Caller-facing pagination parameters for list operations.
#[derive(Clone, Debug, Default)]
pub struct PageRequest {
    pub cursor: Option<String>,
    pub limit: Option<u64>,
}

/// Raw row storage for one entity type. Rows go in and come out exactly
/// as given; the backend applies no policy of its own. Mutations are
/// conditional on current ownership so that the ownership check and the
/// write are a single atomic step - a row that changed hands between a
/// read and a mutation is left alone, never overwritten.
#[async_trait]
pub trait RecordStore<E: ScopedEntity>: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError>;

    /// Store a new row. `false` means the id is already taken (by any
    /// tenant's row); nothing is written.
    async fn insert(&self, row: E) -> Result<bool, StoreError>;

    /// Replace the row with `row.id()`, but only if the stored row's
    /// tenant id equals `row.tenant_id()`. `false` means the row is
    /// absent or owned by a different tenant; nothing is written.
    async fn update(&self, row: E) -> Result<bool, StoreError>;

    /// Remove the row with `id`, but only if it belongs to `tenant_id`.
    /// `false` means the row is absent or owned by a different tenant.
    async fn delete(&self, id: Uuid, tenant_id: Uuid) -> Result<bool, StoreError>;

    async fn scan(&self) -> Result<Vec<E>, StoreError>;
}

/// Tenant-scoping repository over one entity type.
pub struct ScopedRepo<E: ScopedEntity> {
    store: Arc<dyn RecordStore<E>>,
    cache: TenantCache,
    quota: Arc<QuotaEnforcer>,
    audit: Arc<dyn AuditSink>,
    limits: LimitCfg,
}

impl<E: ScopedEntity> Clone for ScopedRepo<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: self.cache.clone(),
            quota: self.quota.clone(),
            audit: self.audit.clone(),
            limits: self.limits,
        }
    }
}

impl<E: ScopedEntity> ScopedRepo<E> {
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore<E>>,
        cache: TenantCache,
        quota: Arc<QuotaEnforcer>,
        audit: Arc<dyn AuditSink>,
        limits: LimitCfg,
    ) -> Self {
        Self {
            store,
            cache,
            quota,
            audit,
            limits,
        }
    }

    /// Fetch one record by id, within the bound tenant.
    ///
    /// Without a tenant binding this is `Ok(None)`, indistinguishable
    /// from a miss; an unscoped read must not learn whether the id exists.
    ///
    /// # Errors
    /// Propagates backend failures.
    pub async fn find(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        let Some(tenant) = context::current_tenant() else {
            return Ok(None);
        };

        let key = TenantCache::key(tenant, E::KIND.as_str(), &format!("id:{id}"));
        if let Some(hit) = self.cache.get::<E>(&key).await {
            if hit.tenant_id() == tenant {
                return Ok(Some(hit));
            }
        }

        let row = self
            .store
            .get(id)
            .await?
            .filter(|row| row.tenant_id() == tenant);
        if let Some(row) = &row {
            self.cache.set(&key, row, None).await;
        }
        Ok(row)
    }

    /// List the bound tenant's records, newest first, keyset-paginated.
    ///
    /// Without a tenant binding this is an empty page. The first page of
    /// each (limit, cursor) shape is served from the tenant's cache
    /// namespace until a write invalidates it.
    ///
    /// # Errors
    /// Rejects malformed cursors and cursors minted for a different
    /// ordering; propagates backend failures.
    pub async fn list(&self, req: &PageRequest) -> Result<Page<E>, StoreError> {
        let Some(tenant) = context::current_tenant() else {
            return Ok(Page::empty());
        };

        let limit = self.limits.clamp(req.limit);
        let cursor = match req.cursor.as_deref() {
            Some(token) => {
                let cursor = Cursor::decode(token)?;
                cursor.validate_order(ORDER_TOKENS)?;
                Some(cursor)
            }
            None => None,
        };

        let suffix = format!(
            "list:{limit}:{}",
            req.cursor.as_deref().unwrap_or("start")
        );
        let key = TenantCache::key(tenant, E::KIND.as_str(), &suffix);
        if let Some(hit) = self.cache.get::<Page<E>>(&key).await {
            return Ok(hit);
        }

        let page = self.page_rows(tenant, limit, cursor.as_ref(), None).await?;
        self.cache.set(&key, &page, None).await;
        Ok(page)
    }

    /// Like [`ScopedRepo::list`] but with an extra caller predicate,
    /// applied after (never instead of) the tenant filter. Filtered lists
    /// bypass the cache; the predicate is not part of any cache key.
    ///
    /// # Errors
    /// Same as [`ScopedRepo::list`].
    pub async fn list_filtered(
        &self,
        req: &PageRequest,
        pred: impl Fn(&E) -> bool + Sync,
    ) -> Result<Page<E>, StoreError> {
        let Some(tenant) = context::current_tenant() else {
            return Ok(Page::empty());
        };

        let limit = self.limits.clamp(req.limit);
        let cursor = match req.cursor.as_deref() {
            Some(token) => {
                let cursor = Cursor::decode(token)?;
                cursor.validate_order(ORDER_TOKENS)?;
                Some(cursor)
            }
            None => None,
        };

        self.page_rows(tenant, limit, cursor.as_ref(), Some(&pred))
            .await
    }

    /// Count the bound tenant's records. Without a binding this is zero.
    ///
    /// # Errors
    /// Propagates backend failures.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let Some(tenant) = context::current_tenant() else {
            return Ok(0);
        };

        let key = TenantCache::key(tenant, E::KIND.as_str(), "count");
        self.cache
            .get_or_fetch(&key, None, || async {
                let rows = self.store.scan().await?;
                let count = rows.iter().filter(|row| row.tenant_id() == tenant).count();
                Ok(u64::try_from(count).unwrap_or(u64::MAX))
            })
            .await
    }

    /// Insert a new record for the bound tenant.
    ///
    /// The draft's tenant id is overwritten from the binding regardless of
    /// what the caller put there, and the injection is audited. The quota
    /// gate runs first; the usage counter only moves after the store
    /// confirms the insert.
    ///
    /// # Errors
    /// [`StoreError::TenantIsolationViolation`] without a binding,
    /// [`StoreError::QuotaExceeded`] at the plan limit, plus backend
    /// failures.
    pub async fn create(&self, mut draft: E) -> Result<E, StoreError> {
        let Some(tenant) = context::current_tenant() else {
            return Err(self.blocked("create"));
        };

        match self.quota.check(tenant, E::KIND.resource_kind()) {
            QuotaDecision::Allow => {}
            QuotaDecision::Deny { reason } => {
                return Err(StoreError::QuotaExceeded { reason });
            }
        }

        // Caller-supplied tenant ids are ignored, not trusted.
        draft.set_tenant_id(tenant);
        self.audit.record(
            AuditRecord::new(AuditKind::TenantInjected, Some(tenant))
                .operation("create")
                .entity(E::KIND.as_str()),
        );

        // A colliding caller-chosen id gets a fresh one instead of an
        // error: failing would tell the caller that the guessed id exists
        // somewhere, possibly in another tenant.
        let mut inserted = self.store.insert(draft.clone()).await?;
        for _ in 0..3 {
            if inserted {
                break;
            }
            draft.set_id(Uuid::new_v4());
            inserted = self.store.insert(draft.clone()).await?;
        }
        if !inserted {
            return Err(StoreError::Backend(
                "insert kept colliding on fresh ids".to_owned(),
            ));
        }

        self.quota.record_create(tenant, E::KIND.resource_kind());
        self.invalidate_namespace(tenant).await;
        Ok(draft)
    }

    /// Apply a mutation to one of the bound tenant's records.
    ///
    /// `Ok(None)` when the id does not exist in this tenant - including
    /// when it exists in another one. The tenant id is re-asserted after
    /// the closure runs; no update can move a row between tenants.
    ///
    /// # Errors
    /// [`StoreError::TenantIsolationViolation`] without a binding, plus
    /// backend failures.
    pub async fn update(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut E) + Send,
    ) -> Result<Option<E>, StoreError> {
        let Some(tenant) = context::current_tenant() else {
            return Err(self.blocked("update"));
        };

        let Some(mut row) = self
            .store
            .get(id)
            .await?
            .filter(|row| row.tenant_id() == tenant)
        else {
            return Ok(None);
        };

        apply(&mut row);
        row.set_tenant_id(tenant);
        row.set_updated_at(Utc::now());

        // The write re-checks ownership atomically: if the row vanished
        // or the id was reoccupied by another tenant since the read
        // above, nothing is written.
        if !self.store.update(row.clone()).await? {
            return Ok(None);
        }
        self.invalidate_namespace(tenant).await;
        Ok(Some(row))
    }

    /// Delete one of the bound tenant's records. `Ok(false)` when the id
    /// is absent from this tenant. Releases the quota counter on success.
    ///
    /// # Errors
    /// [`StoreError::TenantIsolationViolation`] without a binding, plus
    /// backend failures.
    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let Some(tenant) = context::current_tenant() else {
            return Err(self.blocked("delete"));
        };

        let removed = self.store.delete(id, tenant).await?;
        if removed {
            self.quota.record_delete(tenant, E::KIND.resource_kind());
            self.invalidate_namespace(tenant).await;
        }
        Ok(removed)
    }

    /// Delete every record of the bound tenant matching `pred`. Returns
    /// how many rows went away.
    ///
    /// # Errors
    /// [`StoreError::TenantIsolationViolation`] without a binding, plus
    /// backend failures.
    pub async fn delete_many(
        &self,
        pred: impl Fn(&E) -> bool + Send + Sync,
    ) -> Result<u64, StoreError> {
        let Some(tenant) = context::current_tenant() else {
            return Err(self.blocked("delete_many"));
        };

        let doomed: Vec<Uuid> = self
            .store
            .scan()
            .await?
            .into_iter()
            .filter(|row| row.tenant_id() == tenant && pred(row))
            .map(|row| row.id())
            .collect();

        let mut removed = 0u64;
        for id in doomed {
            if self.store.delete(id, tenant).await? {
                self.quota.record_delete(tenant, E::KIND.resource_kind());
                removed += 1;
            }
        }
        if removed > 0 {
            self.invalidate_namespace(tenant).await;
        }
        Ok(removed)
    }

    async fn page_rows(
        &self,
        tenant: Uuid,
        limit: u64,
        cursor: Option<&Cursor>,
        filter: Option<&(dyn Fn(&E) -> bool + Sync)>,
    ) -> Result<Page<E>, StoreError> {
        let after = cursor.map(cursor_position).transpose()?;

        let mut rows: Vec<E> = self
            .store
            .scan()
            .await?
            .into_iter()
            .filter(|row| row.tenant_id() == tenant)
            .filter(|row| filter.is_none_or(|pred| pred(row)))
            .filter(|row| after.is_none_or(|pos| (row.created_at(), row.id()) < pos))
            .collect();
        rows.sort_by(|a, b| (b.created_at(), b.id()).cmp(&(a.created_at(), a.id())));

        let keep = usize::try_from(limit).unwrap_or(usize::MAX).saturating_add(1);
        rows.truncate(keep);

        Ok(slice_page(rows, limit, SortDir::Desc, ORDER_TOKENS, row_keys))
    }

    async fn invalidate_namespace(&self, tenant: Uuid) {
        let pattern = TenantCache::namespace_pattern(tenant, E::KIND.as_str());
        let removed = self.cache.invalidate_pattern(&pattern).await;
        tracing::debug!(
            entity = E::KIND.as_str(),
            %tenant,
            removed,
            "cache namespace invalidated after write"
        );
    }

    fn blocked(&self, operation: &'static str) -> StoreError {
        tracing::error!(
            operation,
            entity = E::KIND.as_str(),
            "mutation without tenant context blocked"
        );
        self.audit.record(
            AuditRecord::new(AuditKind::OperationBlocked, None)
                .operation(operation)
                .entity(E::KIND.as_str()),
        );
        StoreError::TenantIsolationViolation {
            operation,
            entity: E::KIND.as_str(),
        }
    }
}

/// Sort-key values of a row, for continuation cursors. RFC 3339 with
/// nanoseconds keeps the string order identical to the time order.
fn row_keys<E: ScopedEntity>(row: &E) -> Vec<String> {
    vec![
        row.created_at().to_rfc3339_opts(SecondsFormat::Nanos, true),
        row.id().to_string(),
    ]
}

/// Decode the keyset position out of a cursor's key values.
fn cursor_position(cursor: &Cursor) -> Result<(DateTime<Utc>, Uuid), PageError> {
    let [created_at, id] = cursor.k.as_slice() else {
        return Err(PageError::CursorInvalidKeys);
    };
    let created_at = DateTime::parse_from_rfc3339(created_at)
        .map_err(|_| PageError::CursorInvalidKeys)?
        .with_timezone(&Utc);
    let id = Uuid::parse_str(id).map_err(|_| PageError::CursorInvalidKeys)?;
    Ok((created_at, id))
}
