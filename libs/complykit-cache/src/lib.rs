//! Tenant-namespaced caching for read-heavy query paths.
//!
//! Keys are always partitioned as `tenant:{tenant_id}:{resource}:{suffix}`
//! so a write can invalidate exactly one tenant's view of one resource.
//!
//! This cache is a performance layer, never a security layer: backend
//! failures degrade to the direct store path (fail open), and tenant
//! isolation is enforced independently by the scoped repositories on every
//! cache miss.

pub mod backend;
pub mod layer;

pub use backend::{CacheBackend, CacheError, InMemoryCacheBackend};
pub use layer::TenantCache;

/// Default entry TTL, in seconds. Differentiated TTLs are tuning, not
/// correctness; staleness is bounded by this value.
pub const DEFAULT_TTL_SECS: u64 = 300;
