//! Security primitives shared by the CompliKit core.
//!
//! This crate holds the building blocks every other module consumes:
//! authenticated principals, the request-scoped tenant context binding,
//! and the append-only tenant-access audit trail.

pub mod audit;
pub mod context;
pub mod principal;

pub use audit::{AuditKind, AuditRecord, AuditSink, MemoryAuditLog, TracingAuditSink};
pub use context::{bind, current, current_tenant, TenantContext};
pub use principal::{Principal, Role};
