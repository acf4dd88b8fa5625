//! Infrastructure layer
//!
//! Handles all I/O operations: filesystem access, package discovery and
//! external processes.

pub mod discovery;
pub mod executor;
pub mod filesystem;
