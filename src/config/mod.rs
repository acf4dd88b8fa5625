//! Configuration and constants
//!
//! Compile-time defaults shared by the config loader and the CLI.

pub mod defaults;
