//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Parser;

use commands::Commands;

use crate::config::defaults::CONFIG_FILE_NAME;
use crate::core::arbiter::Arbiter;
use crate::core::config::LinfraConfig;
use crate::core::pipeline::Pipeline;
use crate::core::pipeline_builder::build_pipeline;
use crate::infra::executor::CommandExecutor;
use crate::infra::filesystem;

/// Linfra - monorepo build orchestrator
///
/// Builds the packages of a repository level by level, in dependency order.
#[derive(Parser, Debug)]
#[command(name = "linfra")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Packages folder, replaces the configured ones (repeatable)
    #[arg(long = "packages", global = true, value_name = "DIR")]
    pub packages: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let Some(command) = self.command else {
            use clap::CommandFactory;
            Self::command().print_help()?;
            return Ok(());
        };

        let project_dir = std::env::current_dir()?;
        let context = Context::load(&project_dir, self.config.as_deref(), &self.packages)?;
        command.run(&context).await
    }
}

/// Project directory and effective configuration of one invocation
#[derive(Debug, Clone)]
pub struct Context {
    pub project_dir: PathBuf,
    pub config_path: PathBuf,
    pub config: LinfraConfig,
}

impl Context {
    /// Load the configuration and apply command-line overrides
    pub fn load(project_dir: &Path, config: Option<&Path>, packages: &[PathBuf]) -> Result<Self> {
        let config_path = config.map_or_else(
            || project_dir.join(CONFIG_FILE_NAME),
            |p| project_dir.join(p),
        );

        let mut loaded = LinfraConfig::load_from_path(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        if !packages.is_empty() {
            loaded.packages = packages.to_vec();
        }

        let mut config = loaded.resolved(project_dir);
        config.roots = normalize(config.roots)?;
        config.packages = normalize(config.packages)?;

        tracing::debug!("Packages folders: {:?}", config.packages);
        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            config_path,
            config,
        })
    }

    /// Discover the packages and build their pipeline
    pub fn pipeline(&self) -> Result<Pipeline> {
        build_pipeline(&self.config.packages).context("Failed to build pipeline")
    }

    /// Arbiter over this project's pipeline
    pub fn arbiter(&self) -> Result<Arbiter> {
        let executor = CommandExecutor::new().with_color(std::io::stdout().is_terminal());
        let mut arbiter = Arbiter::new(self.config.clone()).with_executor(executor);
        arbiter.set_pipeline(self.pipeline()?);
        Ok(arbiter)
    }
}

fn normalize(paths: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    paths
        .into_iter()
        .map(|p| {
            filesystem::absolute_path(&p)
                .with_context(|| format!("Failed to resolve {}", p.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_defaults() {
        let temp = TempDir::new().unwrap();
        let context = Context::load(temp.path(), None, &[]).unwrap();

        assert_eq!(context.config_path, temp.path().join("linfra.toml"));
        assert_eq!(context.config.roots, vec![temp.path().to_path_buf()]);
        assert_eq!(context.config.packages, vec![temp.path().join("packages")]);
    }

    #[test]
    fn test_packages_flag_overrides_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("linfra.toml"), "packages = [\"libs\"]\n").unwrap();

        let context = Context::load(temp.path(), None, &[PathBuf::from("apps")]).unwrap();
        assert_eq!(context.config.packages, vec![temp.path().join("apps")]);

        let context = Context::load(temp.path(), None, &[]).unwrap();
        assert_eq!(context.config.packages, vec![temp.path().join("libs")]);
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "linfra", "build", "-vv", "--packages", "libs", "--packages", "apps", "--jobs", "4",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.packages.len(), 2);
        assert!(matches!(
            cli.command,
            Some(Commands::Build { jobs: Some(4), .. })
        ));
    }
}
