//! Linfra - monorepo build orchestrator
//!
//! Discovers the packages of a repository, orders them into dependency
//! levels and runs their build commands level by level.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Dependency graph, pipeline and build orchestration
//! - [`infra`] - Infrastructure layer (filesystem, discovery, processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use linfra::core::arbiter::Arbiter;
//! use linfra::core::config::LinfraConfig;
//! use linfra::core::pipeline_builder::build_pipeline;
//!
//! let pipeline = build_pipeline(&["packages"])?;
//! let mut arbiter = Arbiter::new(LinfraConfig::default());
//! arbiter.set_pipeline(pipeline);
//! arbiter.run_full_build().await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
