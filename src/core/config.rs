//! Project configuration
//!
//! Reads `linfra.toml` from the project root. Every setting is optional; a
//! missing file yields the defaults from [`crate::config::defaults`].
//!
//! ```toml
//! roots = ["."]
//! packages = ["packages"]
//!
//! [commands]
//! build = "npm run build"
//!
//! [concurrency]
//! build_level = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::defaults;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("Failed to access config file '{path}': {error}")]
    Io { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Complete linfra configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinfraConfig {
    /// Repository roots the bootstrap command runs in
    pub roots: Vec<PathBuf>,

    /// Folders whose subfolders are packages
    pub packages: Vec<PathBuf>,

    /// Shell commands
    pub commands: CommandConfig,

    /// Container settings
    pub docker: DockerConfig,

    /// Per-phase concurrency limits
    pub concurrency: ConcurrencyConfig,

    /// Build behaviour
    pub build: BuildConfig,
}

impl Default for LinfraConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(defaults::DEFAULT_ROOT_FOLDER)],
            packages: vec![PathBuf::from(defaults::DEFAULT_PACKAGES_FOLDER)],
            commands: CommandConfig::default(),
            docker: DockerConfig::default(),
            concurrency: ConcurrencyConfig::default(),
            build: BuildConfig::default(),
        }
    }
}

/// Shell commands run for every package or repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Links the packages of a repository root
    pub bootstrap: String,
    /// Builds one package
    pub build: String,
    /// Rebuilds one package on change
    pub watch: String,
    /// Folder inside a package that receives dependency copies
    pub deps_folder: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            bootstrap: defaults::DEFAULT_BOOTSTRAP_COMMAND.to_string(),
            build: defaults::DEFAULT_BUILD_COMMAND.to_string(),
            watch: defaults::DEFAULT_WATCH_COMMAND.to_string(),
            deps_folder: defaults::DEFAULT_DEPS_FOLDER.to_string(),
        }
    }
}

/// Container build settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Image tag prefix, images are tagged `<prefix>-<folder name>`
    pub image_prefix: String,
    /// Container build file name
    pub dockerfile: String,
    /// Compose CLI
    pub compose_command: String,
    /// Base compose file name
    pub compose_file: String,
    /// Compose variant with dependency volumes
    pub compose_deps_file: String,
    /// Compose variant running the build command
    pub compose_build_file: String,
    /// Compose variant running the watch command
    pub compose_watch_file: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            image_prefix: defaults::DEFAULT_IMAGE_PREFIX.to_string(),
            dockerfile: defaults::DEFAULT_DOCKERFILE.to_string(),
            compose_command: defaults::DEFAULT_COMPOSE_COMMAND.to_string(),
            compose_file: defaults::DEFAULT_COMPOSE_FILE.to_string(),
            compose_deps_file: defaults::DEFAULT_COMPOSE_DEPS_FILE.to_string(),
            compose_build_file: defaults::DEFAULT_COMPOSE_BUILD_FILE.to_string(),
            compose_watch_file: defaults::DEFAULT_COMPOSE_WATCH_FILE.to_string(),
        }
    }
}

impl DockerConfig {
    /// Image tag for a package folder
    pub fn image_tag(&self, folder_name: &str) -> String {
        format!("{}-{}", self.image_prefix, folder_name).to_lowercase()
    }
}

/// Concurrency limit of every phase
///
/// A limit of 0 is treated as 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Repository roots bootstrapped at once
    pub init_packages: usize,
    /// Packages of a level started in watch mode at once
    pub start_level: usize,
    /// Packages of a level stopped at once
    pub stop_level: usize,
    /// Packages of a level built at once
    pub build_level: usize,
    /// Packages of a level cleaned up at once
    pub restore_level: usize,
    /// Dependencies copied into one package at once
    pub copy_dependencies: usize,
    /// Dependency copies removed from one package at once
    pub remove_dependencies: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            init_packages: defaults::DEFAULT_CONCURRENCY,
            start_level: defaults::DEFAULT_CONCURRENCY,
            stop_level: defaults::DEFAULT_CONCURRENCY,
            build_level: defaults::DEFAULT_CONCURRENCY,
            restore_level: defaults::DEFAULT_CONCURRENCY,
            copy_dependencies: defaults::DEFAULT_CONCURRENCY,
            remove_dependencies: defaults::DEFAULT_CONCURRENCY,
        }
    }
}

impl ConcurrencyConfig {
    /// Use `jobs` for every per-level phase
    pub fn set_level_jobs(&mut self, jobs: usize) {
        self.start_level = jobs;
        self.stop_level = jobs;
        self.build_level = jobs;
        self.restore_level = jobs;
    }
}

/// Build behaviour switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Skip re-running the bootstrap command after the build
    pub skip_restore_step: bool,
    /// Abort the build when a package build command fails
    pub fail_on_error: bool,
}

impl LinfraConfig {
    /// Load configuration from `path`
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid, returns an error.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Save configuration to `path`
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.display().to_string(),
                error: e.to_string(),
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Resolve relative `roots` and `packages` against `base`
    #[must_use]
    pub fn resolved(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        self.roots = self.roots.into_iter().map(resolve).collect();
        self.packages = self.packages.into_iter().map(resolve).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LinfraConfig::default();
        assert_eq!(config.packages, vec![PathBuf::from("packages")]);
        assert_eq!(config.commands.build, "npm run dev:build");
        assert_eq!(config.concurrency.build_level, 1);
        assert_eq!(config.concurrency.remove_dependencies, 1);
        assert_eq!(config.docker.compose_watch_file, "docker-compose.watch.yml");
        assert!(!config.build.skip_restore_step);
        assert!(!config.build.fail_on_error);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = LinfraConfig::load_from_path(&temp_dir.path().join("linfra.toml")).unwrap();
        assert_eq!(config, LinfraConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("linfra.toml");
        fs::write(
            &config_path,
            r#"
packages = ["libs", "apps"]

[commands]
build = "make"

[concurrency]
build_level = 4
"#,
        )
        .unwrap();

        let config = LinfraConfig::load_from_path(&config_path).unwrap();
        assert_eq!(
            config.packages,
            vec![PathBuf::from("libs"), PathBuf::from("apps")]
        );
        assert_eq!(config.commands.build, "make");
        assert_eq!(config.commands.watch, "npm run dev:watch");
        assert_eq!(config.concurrency.build_level, 4);
        assert_eq!(config.concurrency.restore_level, 1);
    }

    #[test]
    fn test_load_invalid_toml_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("linfra.toml");
        fs::write(&config_path, "invalid toml [[[").unwrap();

        assert!(matches!(
            LinfraConfig::load_from_path(&config_path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested/linfra.toml");

        let mut config = LinfraConfig::default();
        config.build.fail_on_error = true;
        config.concurrency.set_level_jobs(3);

        config.save_to_path(&config_path).unwrap();
        assert_eq!(LinfraConfig::load_from_path(&config_path).unwrap(), config);
    }

    #[test]
    fn test_resolved_paths() {
        let config = LinfraConfig {
            packages: vec![PathBuf::from("packages"), PathBuf::from("/abs/libs")],
            ..LinfraConfig::default()
        }
        .resolved(Path::new("/repo"));

        assert_eq!(config.roots, vec![PathBuf::from("/repo/.")]);
        assert_eq!(
            config.packages,
            vec![PathBuf::from("/repo/packages"), PathBuf::from("/abs/libs")]
        );
    }

    #[test]
    fn test_image_tag() {
        let docker = DockerConfig::default();
        assert_eq!(docker.image_tag("Core"), "app-core");
    }
}
