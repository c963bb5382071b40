//! Compliance Store Module
//!
//! The query-interception layer: every data operation against a
//! tenant-scoped entity type goes through a [`ScopedRepo`], which reads
//! the request's tenant context from task-local storage and rewrites the
//! operation under the hood - adding the tenant filter on reads, injecting
//! the tenant id on creates, and refusing mutations that have no context.
//!
//! The entity catalog is a fixed allow-list (`EntityKind` and the six
//! record types), not something inferred at runtime; an entity type the
//! enum does not name simply has no repository here. This trades a little
//! boilerplate for compile-time certainty that nothing was missed.

pub mod config;
pub mod domain;
pub mod infra;

pub use config::StoreConfig;
pub use domain::entity::{
    AuditRun, AuditRunStatus, Contractor, EntityKind, FormTemplate, Incident, Permit,
    ScopedEntity, Severity, Station,
};
pub use domain::error::StoreError;
pub use domain::repo::{PageRequest, RecordStore, ScopedRepo};
pub use domain::store::ComplianceStore;
pub use infra::memory::InMemoryTable;
