//! Append-only tenant-access audit trail.
//!
//! Every tenant-context switch, validation failure, filter injection, and
//! blocked operation produces a structured [`AuditRecord`]. Sinks are
//! intentionally cheap and synchronous; the hot path must not wait on
//! audit I/O.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// A principal's tenant context was resolved and validated.
    ContextResolved,
    /// Tenant validation rejected the attempt (unknown, inactive, or
    /// directory unavailable).
    ValidationFailed,
    /// The tenant id was injected into a create payload.
    TenantInjected,
    /// A mutation was blocked for lacking tenant context.
    OperationBlocked,
    /// A create was denied by plan quota.
    QuotaDenied,
}

/// One entry in the audit stream.
#[derive(Clone, Debug, serde::Serialize)]
pub struct AuditRecord {
    #[serde(rename = "type")]
    pub kind: AuditKind,
    /// Tenant the record concerns. `None` when the operation had no
    /// resolvable tenant at all (e.g. a blocked unscoped mutation).
    pub tenant_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub at: DateTime<Utc>,
}

impl AuditRecord {
    #[must_use]
    pub fn new(kind: AuditKind, tenant_id: Option<Uuid>) -> Self {
        Self {
            kind,
            tenant_id,
            principal_id: None,
            operation: None,
            entity: None,
            reason: None,
            at: Utc::now(),
        }
    }

    #[must_use]
    pub fn principal(mut self, principal_id: Uuid) -> Self {
        self.principal_id = Some(principal_id);
        self
    }

    #[must_use]
    pub fn operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    #[must_use]
    pub fn entity(mut self, entity: &'static str) -> Self {
        self.entity = Some(entity);
        self
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Destination for audit records.
///
/// Implementations must be safe under concurrent `record` calls and must
/// never drop isolation-related entries silently.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: AuditRecord);
}

/// In-process append-only audit log.
///
/// The default sink for tests and single-node deployments. Records are
/// only ever appended; [`MemoryAuditLog::records`] hands out a snapshot.
#[derive(Default)]
pub struct MemoryAuditLog {
    records: parking_lot::Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far, in append order.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, record: AuditRecord) {
        self.records.lock().push(record);
    }
}

/// Sink that forwards records to the `tracing` pipeline as structured
/// events, for deployments where the log aggregator is the audit store.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: AuditRecord) {
        match serde_json::to_string(&record) {
            Ok(json) => tracing::info!(target: "complikit::audit", record = %json, "audit"),
            Err(err) => tracing::error!(target: "complikit::audit", error = %err, "unserializable audit record"),
        }
    }
}
