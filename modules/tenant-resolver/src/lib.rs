//! Tenant Resolver Module
//!
//! Determines which tenant a request belongs to and validates the answer
//! against the tenant directory before any data access happens.
//!
//! Validation is fail-closed: if the directory cannot be consulted the
//! resolver refuses the request rather than letting an unverified tenant
//! through. Positive validations are cached with a short TTL to keep the
//! directory off the per-request hot path.

pub mod config;
pub mod domain;

pub use config::TenantResolverConfig;
pub use domain::directory::{DirectoryError, InMemoryTenantDirectory, TenantDirectory};
pub use domain::model::{PlanTier, SsoConfig, Tenant, TenantStatus};
pub use domain::service::{TenantResolveError, TenantResolver};
