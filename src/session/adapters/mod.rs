//! Adapter implementations for session ports.

pub mod file;
pub mod memory;
