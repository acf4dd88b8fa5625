//! Implements `linfra watch start|stop`

use anyhow::{bail, Result};

use crate::cli::output::{print_info, print_success};
use crate::cli::Context;

/// Start watch mode for one package or all of them
pub async fn execute_start(context: &Context, package: Option<&str>, all: bool) -> Result<()> {
    let arbiter = context.arbiter()?;

    match (package, all) {
        (_, true) => {
            let reports = arbiter.start_watch_all().await?;
            print_success(&format!("Watch started for {} package(s)", reports.len()));
        }
        (Some(name), false) => {
            let report = arbiter.start_watch(name).await?;
            if !report.success {
                bail!("Watch for '{name}' exited with {:?}", report.code);
            }
            print_success(&format!("Watch started for '{name}'"));
        }
        (None, false) => bail!("Name a package or pass --all"),
    }
    Ok(())
}

/// Stop watch mode for one package or all of them
pub async fn execute_stop(context: &Context, package: Option<&str>, all: bool) -> Result<()> {
    let arbiter = context.arbiter()?;

    match (package, all) {
        (_, true) => {
            let reports = arbiter.stop_watch_all().await?;
            print_success(&format!("Watch stopped for {} package(s)", reports.len()));
        }
        (Some(name), false) => match arbiter.stop_watch(name).await? {
            Some(_) => print_success(&format!("Watch stopped for '{name}'")),
            None => print_info(&format!("'{name}' has no compose file, nothing to stop")),
        },
        (None, false) => bail!("Name a package or pass --all"),
    }
    Ok(())
}
