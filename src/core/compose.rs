//! Docker Compose documents
//!
//! Loads a package's `docker-compose.yml`, derives the `deps`, `build` and
//! `watch` variants from it and writes them next to the base file. Keys the
//! model does not know about are carried through untouched.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::core::module::Module;
use crate::error::{ComposeError, FilesystemError};

/// A compose file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DockerCompose {
    /// File format version, string or number as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,

    /// Top-level networks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Value>,

    /// Services by name
    #[serde(default)]
    pub services: BTreeMap<String, ComposeService>,

    /// Any other top-level keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One compose service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposeService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Value>,

    /// Short `host:container` strings or long-syntax mappings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Value>,

    /// String or list form, both are kept as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Value>,

    /// Any other service keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl DockerCompose {
    /// Parse a compose document
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ComposeError> {
        serde_yaml::from_str(content).map_err(|e| ComposeError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> Result<String, ComposeError> {
        serde_yaml::to_string(self).map_err(|e| ComposeError::Serialize {
            error: e.to_string(),
        })
    }

    /// Read and parse the compose file at `path`
    pub async fn load(path: &Path) -> Result<Self, ComposeError> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| FilesystemError::ReadFile {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                })?;
        Self::from_yaml(&content, path)
    }

    /// Write the document to `path`, replacing any existing file
    pub async fn save(&self, path: &Path) -> Result<(), ComposeError> {
        let content = self.to_yaml()?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| FilesystemError::WriteFile {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;
        Ok(())
    }

    /// Copy of the document with `update` applied to every service
    #[must_use]
    pub fn update_services<F>(&self, mut update: F) -> Self
    where
        F: FnMut(&mut ComposeService),
    {
        let mut document = self.clone();
        for service in document.services.values_mut() {
            update(service);
        }
        document
    }

    /// `deps` variant: each dependency mounted as `<path>:/<folder name>`,
    /// service commands removed
    #[must_use]
    pub fn with_dependency_volumes(&self, dependencies: &[&Module]) -> Self {
        let volumes: Vec<Value> = dependencies
            .iter()
            .map(|dep| {
                Value::String(format!("{}:/{}", dep.path().display(), dep.folder_name()))
            })
            .collect();

        self.update_services(|service| {
            service
                .volumes
                .get_or_insert_with(Vec::new)
                .extend(volumes.iter().cloned());
            service.command = None;
        })
    }

    /// Copy with every service running `command`
    #[must_use]
    pub fn with_command(&self, command: &str) -> Self {
        self.update_services(|service| {
            service.command = Some(Value::String(command.to_string()));
        })
    }
}

/// The three derived documents of one package
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeVariants {
    pub deps: DockerCompose,
    pub build: DockerCompose,
    pub watch: DockerCompose,
}

impl ComposeVariants {
    /// Derive the variants from a base document
    pub fn derive(
        base: &DockerCompose,
        dependencies: &[&Module],
        build_command: &str,
        watch_command: &str,
    ) -> Self {
        let deps = base.with_dependency_volumes(dependencies);
        let build = deps.with_command(build_command);
        let watch = deps.with_command(watch_command);
        Self { deps, build, watch }
    }
}
