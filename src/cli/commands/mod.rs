//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod compose;
pub mod deps;
pub mod exec;
pub mod init;
pub mod levels;
pub mod tree;
pub mod watch;

use anyhow::Result;
use clap::Subcommand;

use crate::cli::Context;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default linfra.toml
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Print the build levels
    Levels,

    /// Print the direct in-repo dependencies of a package
    Deps {
        /// Package name
        package: String,
    },

    /// Display dependency tree
    Tree {
        /// Show dependencies for specific package
        package: Option<String>,

        /// Output in DOT graph format
        #[arg(long)]
        graph: bool,
    },

    /// Build every package, level by level
    Build {
        /// Packages built concurrently within a level
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Do not bootstrap again after the build
        #[arg(long)]
        skip_restore: bool,

        /// Stop after the first level with a failed build
        #[arg(long)]
        fail_on_error: bool,
    },

    /// Run a shell command in every package, level by level
    Exec {
        /// Command line passed to the shell
        command: String,

        /// Packages run concurrently within a level
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Generate the docker-compose variants of every package
    Compose,

    /// Start or stop watch mode
    Watch {
        #[command(subcommand)]
        command: WatchCommands,
    },
}

/// Watch subcommands
#[derive(Subcommand, Debug)]
pub enum WatchCommands {
    /// Start watch mode
    Start {
        /// Package name
        package: Option<String>,

        /// Every package, level by level
        #[arg(long, conflicts_with = "package")]
        all: bool,
    },

    /// Stop watch mode
    Stop {
        /// Package name
        package: Option<String>,

        /// Every package, level by level
        #[arg(long, conflicts_with = "package")]
        all: bool,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, context: &Context) -> Result<()> {
        match self {
            Self::Init { force } => init::execute(context, force),
            Self::Levels => levels::execute(context),
            Self::Deps { package } => deps::execute(context, &package),
            Self::Tree { package, graph } => tree::execute(context, package.as_deref(), graph),
            Self::Build {
                jobs,
                skip_restore,
                fail_on_error,
            } => {
                let options = build::BuildOptions {
                    jobs,
                    skip_restore,
                    fail_on_error,
                };
                build::execute(context, options).await
            }
            Self::Exec { command, jobs } => exec::execute(context, &command, jobs).await,
            Self::Compose => compose::execute(context).await,
            Self::Watch { command } => match command {
                WatchCommands::Start { package, all } => {
                    watch::execute_start(context, package.as_deref(), all).await
                }
                WatchCommands::Stop { package, all } => {
                    watch::execute_stop(context, package.as_deref(), all).await
                }
            },
        }
    }
}
