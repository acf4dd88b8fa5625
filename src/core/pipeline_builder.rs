//! Pipeline construction
//!
//! Collects modules from one or more packages folders, binds their
//! dependency edges and partitions them into a [`Pipeline`].

use std::collections::HashSet;
use std::path::Path;

use crate::core::graph::DependencyGraph;
use crate::core::levels;
use crate::core::module::Module;
use crate::core::pipeline::Pipeline;
use crate::error::{DiscoveryError, LinfraError, ResolverError};
use crate::infra::discovery::{self, SkippedManifest};

/// Accumulates modules and builds a pipeline from them
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    modules: Vec<Module>,
    names: HashSet<String>,
    skipped: Vec<SkippedManifest>,
}

impl PipelineBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every package found under `folder`
    ///
    /// Returns how many modules were added. Modules whose name is already
    /// registered are ignored.
    pub fn add_packages(&mut self, folder: &Path) -> Result<usize, DiscoveryError> {
        let found = discovery::discover_packages(folder)?;
        self.skipped.extend(found.skipped);

        let added = found
            .modules
            .into_iter()
            .filter(|module| self.add_module(module.clone()))
            .count();

        tracing::debug!("Registered {added} package(s) from {}", folder.display());
        Ok(added)
    }

    /// Register one module, returns false if the name was already taken
    pub fn add_module(&mut self, module: Module) -> bool {
        if !self.names.insert(module.name().to_string()) {
            tracing::debug!("Package '{}' already registered, skipping", module.name());
            return false;
        }
        self.modules.push(module);
        true
    }

    /// Registered modules in registration order
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Manifests that were found but could not be used
    pub fn skipped(&self) -> &[SkippedManifest] {
        &self.skipped
    }

    /// Partition the registered modules into a pipeline
    pub fn build(&self) -> Result<Pipeline, ResolverError> {
        let graph = DependencyGraph::from_modules(&self.modules);
        let dependencies = graph.dependency_index();
        let levels = levels::partition(graph)?;

        tracing::info!(
            "Pipeline ready: {} module(s) in {} level(s)",
            self.modules.len(),
            levels.len()
        );
        Ok(Pipeline::new(levels, dependencies))
    }
}

/// Build a pipeline from the packages of `folders`
pub fn build_pipeline<P: AsRef<Path>>(folders: &[P]) -> Result<Pipeline, LinfraError> {
    let mut builder = PipelineBuilder::new();
    for folder in folders {
        builder.add_packages(folder.as_ref())?;
    }
    Ok(builder.build()?)
}
