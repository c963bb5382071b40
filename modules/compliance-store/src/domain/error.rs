use complykit_paging::PageError;
use thiserror::Error;

/// Failures surfaced by the scoped repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A mutation arrived without a bound tenant context. Always a caller
    /// bug, never user input; logged at `error` and audited before being
    /// returned.
    #[error("tenant isolation violation: {operation} on {entity} without tenant context")]
    TenantIsolationViolation {
        operation: &'static str,
        entity: &'static str,
    },

    /// The tenant's plan does not allow another record of this type.
    #[error("quota exceeded: {reason}")]
    QuotaExceeded { reason: String },

    /// The underlying record store failed.
    #[error("store backend error: {0}")]
    Backend(String),

    /// The caller supplied an unusable pagination cursor.
    #[error(transparent)]
    Page(#[from] PageError),
}

impl StoreError {
    #[must_use]
    pub fn is_isolation_violation(&self) -> bool {
        matches!(self, StoreError::TenantIsolationViolation { .. })
    }
}
