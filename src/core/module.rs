//! Buildable package model
//!
//! A [`Module`] is one package of the monorepo: the name declared in its
//! `package.json`, the folder it lives in and the names of the packages it
//! depends on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Subset of `package.json` that linfra reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageJson {
    /// Package name
    pub name: String,

    /// Dependency name -> version range
    #[serde(default)]
    pub dependencies: Option<BTreeMap<String, String>>,
}

impl PackageJson {
    /// Parse a manifest from JSON text
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// A package of the monorepo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    name: String,
    folder_name: String,
    path: PathBuf,
    dependencies: Vec<String>,
}

impl Module {
    /// Create a module
    ///
    /// Dependency names are deduplicated, keeping the first occurrence.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        dependencies: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let path = path.into();
        let folder_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut deps: Vec<String> = Vec::new();
        for dep in dependencies {
            let dep = dep.into();
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }

        Self {
            name: name.into(),
            folder_name,
            path,
            dependencies: deps,
        }
    }

    /// Create a module from a parsed manifest found in `path`
    pub fn from_package_json(manifest: PackageJson, path: impl Into<PathBuf>) -> Self {
        let deps = manifest
            .dependencies
            .map(|d| d.into_keys().collect::<Vec<_>>())
            .unwrap_or_default();
        Self::new(manifest.name, path, deps)
    }

    /// Package name (unique key)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the folder holding the package
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// Absolute path of the package folder
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared dependency names, in manifest order
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Whether the module declares a dependency on `name`
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_without_dependencies() {
        let manifest = PackageJson::from_json(r#"{"name": "@linfra/core", "version": "1.0.0"}"#)
            .unwrap();
        assert_eq!(manifest.name, "@linfra/core");
        assert!(manifest.dependencies.is_none());

        let module = Module::from_package_json(manifest, "/repo/packages/core");
        assert_eq!(module.folder_name(), "core");
        assert!(module.dependencies().is_empty());
    }

    #[test]
    fn test_parse_manifest_with_dependencies() {
        let manifest = PackageJson::from_json(
            r#"{"name": "app", "dependencies": {"lodash": "^4.0.0", "@linfra/core": "1.0.0"}}"#,
        )
        .unwrap();
        let module = Module::from_package_json(manifest, "/repo/packages/app");

        assert!(module.depends_on("lodash"));
        assert!(module.depends_on("@linfra/core"));
        assert!(!module.depends_on("app"));
    }

    #[test]
    fn test_manifest_without_name_is_rejected() {
        assert!(PackageJson::from_json(r#"{"dependencies": {}}"#).is_err());
        assert!(PackageJson::from_json("{ not json").is_err());
    }

    #[test]
    fn test_duplicate_dependencies_are_collapsed() {
        let module = Module::new("app", "/p/app", ["core", "core", "utils"]);
        assert_eq!(module.dependencies(), ["core", "utils"]);
    }
}
