//! CLI command for displaying dependency tree
//!
//! Implements the `linfra tree` command.

use anyhow::Result;

use crate::cli::Context;
use crate::core::tree::DependencyTree;

/// Execute the tree command
pub fn execute(context: &Context, package: Option<&str>, graph: bool) -> Result<()> {
    let tree = DependencyTree::from_pipeline(&context.pipeline()?);

    let output = match (package, graph) {
        (Some(name), true) => tree.format_dot_for_package(name)?,
        (Some(name), false) => tree.format_tree_for_package(name)?,
        (None, true) => tree.format_dot(),
        (None, false) => tree.format_tree(),
    };
    print!("{output}");
    Ok(())
}
