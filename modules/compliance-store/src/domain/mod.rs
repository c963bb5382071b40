//! Domain layer: entity catalog, errors, and the scoped repositories.

pub mod entity;
pub mod error;
pub mod repo;
pub mod store;
