//! Implements `linfra compose`

use anyhow::Result;

use crate::cli::output::{print_detail, print_info, print_success};
use crate::cli::Context;

/// Write the compose variants of every package with a compose file
pub async fn execute(context: &Context) -> Result<()> {
    let arbiter = context.arbiter()?;
    let written = arbiter.build_docker_compose_files().await?;

    if written.is_empty() {
        print_info(&format!(
            "No package has a {}",
            context.config.docker.compose_file
        ));
        return Ok(());
    }

    print_success(&format!("Compose files written for {} package(s)", written.len()));
    for name in &written {
        print_detail(name);
    }
    Ok(())
}
