//! Implements `linfra deps <package>`

use anyhow::Result;

use crate::cli::output::is_json;
use crate::cli::Context;
use crate::core::module::Module;

/// Print the direct in-repo dependencies of `package`
pub fn execute(context: &Context, package: &str) -> Result<()> {
    let pipeline = context.pipeline()?;
    let names: Vec<&str> = pipeline
        .dependencies_of(package)?
        .into_iter()
        .map(Module::name)
        .collect();

    if is_json() {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}
