//! Module dependency graph
//!
//! Nodes live in an arena indexed by [`NodeId`]; an edge from A to B means
//! "A depends on B". Every node is also reachable by its module name, which
//! is the node's identity.

use std::collections::HashMap;

use crate::core::module::Module;

/// Index of a node inside a [`DependencyGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in discovery order
    pub fn index(self) -> usize {
        self.0
    }
}

/// A graph node wrapping one module
#[derive(Debug, Clone)]
pub struct GraphNode {
    module: Module,
    /// Ordered set of dependency nodes
    children: Vec<NodeId>,
}

impl GraphNode {
    fn new(module: Module) -> Self {
        Self {
            module,
            children: Vec::new(),
        }
    }

    /// The wrapped module
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Dependency nodes, in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node has any outgoing edge
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether `child` is a dependency of this node
    pub fn has_child(&self, child: NodeId) -> bool {
        self.children.contains(&child)
    }

    /// Add an edge to `child`, no-op if it already exists
    pub fn add_child(&mut self, child: NodeId) {
        if !self.has_child(child) {
            self.children.push(child);
        }
    }

    /// Remove the edge to `child`, no-op if absent
    pub fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|c| *c != child);
    }
}

/// Dependency graph over a module set
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, NodeId>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a module set
    ///
    /// Creates one node per module, then binds every node to the modules of
    /// the set it declares as dependencies. Self references and dependencies
    /// on packages outside the set produce no edge.
    pub fn from_modules<'a>(modules: impl IntoIterator<Item = &'a Module>) -> Self {
        let mut graph = Self::new();
        for module in modules {
            graph.add_module(module.clone());
        }
        graph.bind_dependencies();
        graph
    }

    /// Add a module, returning its node
    ///
    /// If a module with the same name is already present the existing node is
    /// returned and `module` is dropped.
    pub fn add_module(&mut self, module: Module) -> NodeId {
        if let Some(id) = self.index.get(module.name()) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(module.name().to_string(), id);
        self.nodes.push(GraphNode::new(module));
        id
    }

    /// Create the edges declared by every module's dependency list
    pub fn bind_dependencies(&mut self) {
        for id in self.node_ids().collect::<Vec<_>>() {
            let deps: Vec<NodeId> = self.nodes[id.0]
                .module
                .dependencies()
                .iter()
                .filter_map(|name| self.index.get(name).copied())
                .filter(|dep| *dep != id)
                .collect();

            for dep in deps {
                self.add_child(id, dep);
            }
        }
    }

    /// Add the edge `parent -> child`
    ///
    /// Self edges are ignored.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child {
            return;
        }
        self.nodes[parent.0].add_child(child);
    }

    /// Remove the edge `parent -> child` if present
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].remove_child(child);
    }

    /// Whether `id` has any remaining dependency edge
    pub fn has_children(&self, id: NodeId) -> bool {
        self.nodes[id.0].has_children()
    }

    /// Dependency nodes of `id`
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes[id.0].children()
    }

    /// Node by id
    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.0]
    }

    /// Module wrapped by `id`
    pub fn module(&self, id: NodeId) -> &Module {
        &self.nodes[id.0].module
    }

    /// Look a node up by module name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// All node ids in discovery order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Snapshot of the edges: module name -> dependency module names
    pub fn dependency_index(&self) -> HashMap<String, Vec<String>> {
        self.nodes
            .iter()
            .map(|node| {
                let deps = node
                    .children
                    .iter()
                    .map(|c| self.nodes[c.0].module.name().to_string())
                    .collect();
                (node.module.name().to_string(), deps)
            })
            .collect()
    }

    /// Consume the graph, yielding its modules in discovery order
    pub fn into_modules(self) -> Vec<Module> {
        self.nodes.into_iter().map(|n| n.module).collect()
    }
}
