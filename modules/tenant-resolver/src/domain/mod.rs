//! Domain layer: tenant model, directory port, and resolution service.

pub mod directory;
pub mod model;
pub mod service;
