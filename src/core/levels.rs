//! Level partitioning
//!
//! Splits a dependency graph into ordered levels by repeatedly stripping the
//! nodes that have no remaining dependency. Every module of a level only
//! depends on modules of earlier levels, so a level can be processed
//! concurrently once the previous one is done.

use std::collections::HashSet;

use serde::Serialize;

use crate::core::graph::{DependencyGraph, NodeId};
use crate::core::module::Module;
use crate::error::ResolverError;

/// A batch of modules with no dependency on each other
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Level {
    modules: Vec<Module>,
}

impl Level {
    /// Create a level from its modules
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    /// Modules of the level
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Iterate over the modules of the level
    pub fn iter(&self) -> std::slice::Iter<'_, Module> {
        self.modules.iter()
    }

    /// Module names of the level
    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(Module::name).collect()
    }

    /// Whether the level holds a module called `name`
    pub fn contains(&self, name: &str) -> bool {
        self.modules.iter().any(|m| m.name() == name)
    }

    /// Number of modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if level is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<'a> IntoIterator for &'a Level {
    type Item = &'a Module;
    type IntoIter = std::slice::Iter<'a, Module>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}

/// Partition a graph into levels
///
/// Within a level modules keep discovery order. Fails with
/// [`ResolverError::CircularDependency`] as soon as no remaining node is free
/// of dependencies; no partial result is returned.
pub fn partition(mut graph: DependencyGraph) -> Result<Vec<Level>, ResolverError> {
    let mut remaining: Vec<NodeId> = graph.node_ids().collect();
    let mut level_ids: Vec<Vec<NodeId>> = Vec::new();

    while !remaining.is_empty() {
        let ready: Vec<NodeId> = remaining
            .iter()
            .copied()
            .filter(|id| !graph.has_children(*id))
            .collect();

        if ready.is_empty() {
            return Err(ResolverError::CircularDependency {
                cycle: find_cycle(&graph, &remaining),
            });
        }

        let stripped: HashSet<NodeId> = ready.iter().copied().collect();
        remaining.retain(|id| !stripped.contains(id));
        for parent in &remaining {
            for child in &ready {
                graph.remove_child(*parent, *child);
            }
        }

        tracing::debug!("Level {}: {} module(s)", level_ids.len(), ready.len());
        level_ids.push(ready);
    }

    let mut modules: Vec<Option<Module>> = graph.into_modules().into_iter().map(Some).collect();
    let levels = level_ids
        .into_iter()
        .map(|ids| {
            Level::new(
                ids.into_iter()
                    .filter_map(|id| modules[id.index()].take())
                    .collect(),
            )
        })
        .collect();

    Ok(levels)
}

/// Walk one cyclic chain among `remaining`
///
/// Every remaining node has at least one remaining child, so following the
/// first child from any start node must eventually revisit a node. The
/// returned path starts and ends at that node and uses folder names.
fn find_cycle(graph: &DependencyGraph, remaining: &[NodeId]) -> Vec<String> {
    let Some(&start) = remaining.first() else {
        return Vec::new();
    };

    let mut chain: Vec<NodeId> = vec![start];
    let mut current = start;
    loop {
        let Some(&next) = graph.children(current).first() else {
            // Unreachable for a stuck partition; report what was walked
            break;
        };

        if let Some(pos) = chain.iter().position(|id| *id == next) {
            let mut cycle: Vec<String> = chain[pos..]
                .iter()
                .map(|id| graph.module(*id).folder_name().to_string())
                .collect();
            cycle.push(graph.module(next).folder_name().to_string());
            return cycle;
        }

        chain.push(next);
        current = next;
    }

    chain
        .iter()
        .map(|id| graph.module(*id).folder_name().to_string())
        .collect()
}
