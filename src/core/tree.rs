//! Dependency tree visualization
//!
//! Renders the dependencies of a pipeline as an indented tree or as a DOT
//! graph. Declared dependencies that are not part of the repository are shown
//! as external leaves.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::core::pipeline::Pipeline;
use crate::error::ResolverError;

/// Where a dependency lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// Another package of the repository
    Local,
    /// Declared in the manifest, not part of the repository
    External,
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::External => write!(f, "external"),
        }
    }
}

/// A dependency edge in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Target package name
    pub target: String,
    /// Where the target lives
    pub kind: DependencyKind,
}

/// Dependency tree of a pipeline
#[derive(Debug, Default)]
pub struct DependencyTree {
    /// Package -> declared dependencies
    dependencies: BTreeMap<String, Vec<DependencyEdge>>,
    /// Packages no other package depends on
    roots: Vec<String>,
}

impl DependencyTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree of every module in `pipeline`
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        let mut tree = Self::new();
        let mut depended_on = BTreeSet::new();

        for module in pipeline.modules() {
            // Self references never form an edge
            let edges = module
                .dependencies()
                .iter()
                .filter(|dep| dep.as_str() != module.name())
                .map(|dep| {
                    let kind = if pipeline.module(dep).is_some() {
                        depended_on.insert(dep.clone());
                        DependencyKind::Local
                    } else {
                        DependencyKind::External
                    };
                    DependencyEdge {
                        target: dep.clone(),
                        kind,
                    }
                })
                .collect();
            tree.dependencies.insert(module.name().to_string(), edges);
        }

        tree.roots = tree
            .dependencies
            .keys()
            .filter(|name| !depended_on.contains(*name))
            .cloned()
            .collect();
        tree
    }

    /// Packages no other package depends on, sorted
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Declared dependencies of `package`
    pub fn dependencies(&self, package: &str) -> Option<&[DependencyEdge]> {
        self.dependencies.get(package).map(Vec::as_slice)
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Whether `package` is a repository package
    pub fn contains(&self, package: &str) -> bool {
        self.dependencies.contains_key(package)
    }

    /// Format as tree string
    pub fn format_tree(&self) -> String {
        if self.is_empty() {
            return "No packages found".to_string();
        }

        let mut output = String::from("Dependency Tree:\n");
        for (i, root) in self.roots.iter().enumerate() {
            let is_last = i == self.roots.len() - 1;
            self.format_node(&mut output, root, None, "", is_last);
        }
        output
    }

    /// Format the tree below one package
    pub fn format_tree_for_package(&self, package: &str) -> Result<String, ResolverError> {
        self.ensure_known(package)?;

        let mut output = format!("Dependencies for '{package}':\n");
        self.format_node(&mut output, package, None, "", true);
        Ok(output)
    }

    fn format_node(
        &self,
        output: &mut String,
        node: &str,
        kind: Option<DependencyKind>,
        prefix: &str,
        is_last: bool,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let marker = match kind {
            Some(DependencyKind::External) => " [external]",
            _ => "",
        };
        let _ = writeln!(output, "{prefix}{connector}{node}{marker}");

        let Some(deps) = self.dependencies.get(node) else {
            return;
        };

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        for (i, dep) in deps.iter().enumerate() {
            let is_last_dep = i == deps.len() - 1;
            self.format_node(output, &dep.target, Some(dep.kind), &child_prefix, is_last_dep);
        }
    }

    /// Format as DOT graph
    pub fn format_dot(&self) -> String {
        let all: BTreeSet<&str> = self.dependencies.keys().map(String::as_str).collect();
        self.dot("dependencies", &all)
    }

    /// Format the DOT graph of one package and everything it reaches
    pub fn format_dot_for_package(&self, package: &str) -> Result<String, ResolverError> {
        self.ensure_known(package)?;

        let mut reachable = BTreeSet::new();
        self.collect_reachable(package, &mut reachable);
        Ok(self.dot(package, &reachable))
    }

    fn dot(&self, title: &str, packages: &BTreeSet<&str>) -> String {
        let mut output = format!("digraph \"{title}\" {{\n");
        output.push_str("    rankdir=TB;\n");
        output.push_str("    node [shape=box];\n\n");

        for pkg in packages {
            let _ = writeln!(output, "    \"{pkg}\";");
        }
        output.push('\n');

        for from in packages {
            for dep in self.dependencies.get(*from).into_iter().flatten() {
                let style = match dep.kind {
                    DependencyKind::Local => "solid",
                    DependencyKind::External => "dashed",
                };
                let _ = writeln!(
                    output,
                    "    \"{from}\" -> \"{}\" [style={style}, label=\"{}\"];",
                    dep.target, dep.kind
                );
            }
        }

        output.push_str("}\n");
        output
    }

    /// Collect every repository package reachable from `package`
    fn collect_reachable<'a>(&'a self, package: &'a str, reachable: &mut BTreeSet<&'a str>) {
        if !reachable.insert(package) {
            return;
        }
        for dep in self.dependencies.get(package).into_iter().flatten() {
            if dep.kind == DependencyKind::Local {
                self.collect_reachable(&dep.target, reachable);
            }
        }
    }

    fn ensure_known(&self, package: &str) -> Result<(), ResolverError> {
        if self.contains(package) {
            Ok(())
        } else {
            Err(ResolverError::UnknownModule {
                name: package.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::module::Module;
    use crate::core::pipeline_builder::PipelineBuilder;

    fn pipeline(modules: &[(&str, &[&str])]) -> Pipeline {
        let mut builder = PipelineBuilder::new();
        for (name, deps) in modules {
            builder.add_module(Module::new(
                *name,
                format!("/repo/packages/{name}"),
                deps.iter().copied(),
            ));
        }
        builder.build().unwrap()
    }

    fn sample() -> DependencyTree {
        DependencyTree::from_pipeline(&pipeline(&[
            ("app", &["lib", "react"]),
            ("lib", &["core"]),
            ("core", &[]),
            ("other", &[]),
        ]))
    }

    #[test]
    fn test_empty_tree() {
        let tree = DependencyTree::from_pipeline(&Pipeline::default());
        assert!(tree.is_empty());
        assert_eq!(tree.format_tree(), "No packages found");
    }

    #[test]
    fn test_roots_are_packages_nobody_depends_on() {
        let tree = sample();
        assert_eq!(tree.roots(), ["app", "other"]);
        assert_eq!(
            tree.dependencies("app").unwrap()[1],
            DependencyEdge {
                target: "react".into(),
                kind: DependencyKind::External,
            }
        );
    }

    #[test]
    fn test_format_tree() {
        let output = sample().format_tree();
        assert_eq!(
            output,
            "Dependency Tree:\n\
             ├── app\n\
             │   ├── lib\n\
             │   │   └── core\n\
             │   └── react [external]\n\
             └── other\n"
        );
    }

    #[test]
    fn test_format_tree_for_package() {
        let output = sample().format_tree_for_package("lib").unwrap();
        assert!(output.starts_with("Dependencies for 'lib':"));
        assert!(output.contains("core"));
        assert!(!output.contains("app"));
    }

    #[test]
    fn test_unknown_package() {
        let tree = sample();
        assert!(matches!(
            tree.format_tree_for_package("react"),
            Err(ResolverError::UnknownModule { .. })
        ));
        assert!(tree.format_dot_for_package("nope").is_err());
    }

    #[test]
    fn test_dot_format() {
        let output = sample().format_dot();
        assert!(output.starts_with("digraph \"dependencies\""));
        assert!(output.contains("\"lib\" -> \"core\" [style=solid, label=\"local\"];"));
        assert!(output.contains("\"app\" -> \"react\" [style=dashed, label=\"external\"];"));
    }

    #[test]
    fn test_self_dependency_is_not_an_edge() {
        let tree = DependencyTree::from_pipeline(&pipeline(&[("a", &["a"]), ("b", &["a"])]));

        assert!(tree.dependencies("a").unwrap().is_empty());
        assert_eq!(tree.roots(), ["b"]);
        assert_eq!(
            tree.format_tree_for_package("b").unwrap(),
            "Dependencies for 'b':\n└── b\n    └── a\n"
        );
        assert_eq!(tree.format_tree(), "Dependency Tree:\n└── b\n    └── a\n");
        assert!(!tree.format_dot().contains("\"a\" -> \"a\""));
    }

    #[test]
    fn test_lone_self_dependent_package_is_a_root() {
        let tree = DependencyTree::from_pipeline(&pipeline(&[("solo", &["solo"])]));
        assert_eq!(tree.roots(), ["solo"]);
        assert_eq!(tree.format_tree(), "Dependency Tree:\n└── solo\n");
    }

    #[test]
    fn test_format_dot_for_package() {
        let output = sample().format_dot_for_package("lib").unwrap();
        assert!(output.contains("\"lib\" -> \"core\""));
        // Not reachable from lib
        assert!(!output.contains("other"));
        assert!(!output.contains("app"));
    }
}
