//! CLI implementation for `linfra init` command
//!
//! Writes a `linfra.toml` holding every default, ready to be edited.

use anyhow::{bail, Context as _, Result};

use crate::cli::output::{print_detail, print_success};
use crate::cli::Context;
use crate::core::config::LinfraConfig;

/// Execute the init command
pub fn execute(context: &Context, force: bool) -> Result<()> {
    let path = &context.config_path;
    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    LinfraConfig::default()
        .save_to_path(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    print_success(&format!("Created {}", path.display()));
    print_detail("Edit [commands] to match your package scripts");
    Ok(())
}
