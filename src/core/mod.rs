//! Core business logic module
//!
//! Process spawning and filesystem access live in [`crate::infra`]; the
//! arbiter is the only core module that drives them.
//!
//! # Submodules
//!
//! - [`module`] - Package model read from `package.json`
//! - [`graph`] - Dependency graph arena
//! - [`levels`] - Level partitioning and cycle detection
//! - [`pipeline`] - Ordered levels, dependency lookup and level cursor
//! - [`pipeline_builder`] - Discovery to pipeline entry point
//! - [`arbiter`] - Level-by-level build orchestration
//! - [`compose`] - docker-compose documents and their variants
//! - [`color`] - Output tag colours
//! - [`config`] - `linfra.toml` handling
//! - [`tree`] - Dependency tree rendering

pub mod arbiter;
pub mod color;
pub mod compose;
pub mod config;
pub mod graph;
pub mod levels;
pub mod module;
pub mod pipeline;
pub mod pipeline_builder;
pub mod tree;
