//! Implements `linfra exec <command>`

use anyhow::{bail, Result};

use crate::cli::output::{print_detail, print_success, print_warning};
use crate::cli::Context;

/// Run `command` in every package, level by level
pub async fn execute(context: &Context, command: &str, jobs: Option<usize>) -> Result<()> {
    let mut context = context.clone();
    if let Some(jobs) = jobs {
        context.config.concurrency.build_level = jobs;
    }

    let reports = context.arbiter()?.execute_command(command).await?;
    let failed: Vec<_> = reports.iter().filter(|r| !r.success).collect();

    if failed.is_empty() {
        print_success(&format!("'{command}' succeeded in {} package(s)", reports.len()));
        return Ok(());
    }

    print_warning(&format!("'{command}' failed in {} package(s)", failed.len()));
    for report in &failed {
        print_detail(&format!("{} (exit code {:?})", report.tag, report.code));
    }
    bail!("'{command}' failed in {} package(s)", failed.len())
}
