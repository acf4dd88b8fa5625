//! Package discovery
//!
//! Reads the `package.json` of every immediate subfolder of a packages
//! folder. Problems with a single package never abort the scan: a missing
//! manifest means "not a package", an unreadable or malformed one is logged
//! and skipped.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::defaults::MANIFEST_FILE_NAME;
use crate::core::module::{Module, PackageJson};
use crate::error::DiscoveryError;
use crate::infra::filesystem;

/// Why a package folder was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Manifest is not valid JSON or lacks a name
    Malformed(String),
    /// Manifest exists but could not be read as a file
    Unsupported(String),
}

/// A package folder that was left out of the module set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedManifest {
    /// Path of the offending manifest
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Result of scanning one packages folder
#[derive(Debug, Default)]
pub struct Discovery {
    /// Modules found, in folder name order
    pub modules: Vec<Module>,
    /// Folders with a manifest that could not be used
    pub skipped: Vec<SkippedManifest>,
}

/// Scan the immediate subfolders of `folder` for packages
///
/// Module paths are absolute. Fails only if `folder` itself is missing or
/// cannot be listed.
pub fn discover_packages(folder: &Path) -> Result<Discovery, DiscoveryError> {
    let folder = filesystem::absolute_path(folder).map_err(|e| DiscoveryError::ListFailed {
        path: folder.to_path_buf(),
        error: e.to_string(),
    })?;

    if !filesystem::is_directory(&folder) {
        return Err(DiscoveryError::FolderNotFound { path: folder });
    }

    let package_folders =
        filesystem::subfolders(&folder).map_err(|e| DiscoveryError::ListFailed {
            path: folder.clone(),
            error: e.to_string(),
        })?;

    let mut discovery = Discovery::default();
    for package_folder in package_folders {
        match read_module(&package_folder) {
            Ok(Some(module)) => {
                tracing::debug!(
                    "Found package '{}' in {}",
                    module.name(),
                    package_folder.display()
                );
                discovery.modules.push(module);
            }
            Ok(None) => {}
            Err(skipped) => discovery.skipped.push(skipped),
        }
    }

    Ok(discovery)
}

/// Read the module of one package folder
///
/// `Ok(None)` when the folder has no manifest.
fn read_module(package_folder: &Path) -> Result<Option<Module>, SkippedManifest> {
    let manifest_path = package_folder.join(MANIFEST_FILE_NAME);

    let content = match std::fs::read_to_string(&manifest_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            tracing::error!(
                "Unsupported error while reading {}: {e}",
                manifest_path.display()
            );
            return Err(SkippedManifest {
                path: manifest_path,
                reason: SkipReason::Unsupported(e.to_string()),
            });
        }
    };

    match PackageJson::from_json(&content) {
        Ok(manifest) => Ok(Some(Module::from_package_json(
            manifest,
            package_folder.to_path_buf(),
        ))),
        Err(e) => {
            tracing::warn!(
                "Package manifest {} has an invalid JSON structure: {e}",
                manifest_path.display()
            );
            Err(SkippedManifest {
                path: manifest_path,
                reason: SkipReason::Malformed(e.to_string()),
            })
        }
    }
}
