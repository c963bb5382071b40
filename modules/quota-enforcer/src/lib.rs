//! Quota Enforcer Module
//!
//! Gates tenant-scoped creates on plan-based resource ceilings. A denial
//! is a recoverable, user-visible condition (the caller shows an upgrade
//! prompt), never a fault.
//!
//! Usage counters increment only after the underlying create succeeds, so
//! failed creates never consume quota, and the increment is atomic under
//! concurrent creates for the same tenant.

pub mod config;
pub mod limits;
pub mod service;

pub use config::QuotaConfig;
pub use limits::{PlanLimits, ResourceKind};
pub use service::{QuotaDecision, QuotaEnforcer};
