//! Build command implementation
//!
//! Implements `linfra build`: bootstrap, build every level, clean up staged
//! dependencies and restore.

use anyhow::{bail, Context as _, Result};

use crate::cli::output::{is_json, print_detail, print_success, print_warning};
use crate::cli::Context;

/// Build options
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Packages built concurrently within a level
    pub jobs: Option<usize>,
    /// Do not bootstrap again after the build
    pub skip_restore: bool,
    /// Stop after the first level with a failed build
    pub fail_on_error: bool,
}

/// Execute the build command
pub async fn execute(context: &Context, options: BuildOptions) -> Result<()> {
    let mut context = context.clone();
    let config = &mut context.config;
    if let Some(jobs) = options.jobs {
        config.concurrency.set_level_jobs(jobs);
    }
    config.build.skip_restore_step |= options.skip_restore;
    config.build.fail_on_error |= options.fail_on_error;

    let arbiter = context.arbiter()?;
    let report = arbiter.run_full_build().await.context("Build failed")?;

    if is_json() {
        let summary = serde_json::json!({
            "levels": report.levels,
            "failed": report.failed,
            "commands": report.commands.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let modules: usize = report.levels.iter().map(Vec::len).sum();
        if report.is_success() {
            print_success(&format!(
                "Built {modules} package(s) in {} level(s)",
                report.levels.len()
            ));
        } else {
            print_warning(&format!(
                "{} of {modules} package build(s) failed",
                report.failed.len()
            ));
            for name in &report.failed {
                print_detail(name);
            }
        }
    }

    if !report.is_success() {
        bail!("{} package build(s) failed", report.failed.len());
    }
    Ok(())
}
