//! Infrastructure: record-store backends.

pub mod memory;
