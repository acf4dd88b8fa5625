//! Implements `linfra levels`

use anyhow::Result;

use crate::cli::output::is_json;
use crate::cli::Context;

/// Print the build levels, one line per level
pub fn execute(context: &Context) -> Result<()> {
    let pipeline = context.pipeline()?;

    if is_json() {
        println!("{}", serde_json::to_string_pretty(pipeline.levels())?);
        return Ok(());
    }

    if pipeline.is_empty() {
        println!("No packages found");
        return Ok(());
    }

    for (index, level) in pipeline.levels().iter().enumerate() {
        println!("Level {index}: {}", level.names().join(", "));
    }
    Ok(())
}
