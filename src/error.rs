//! Error types for linfra
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Dependency resolution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// Circular dependency detected
    #[error("Circular dependency detected: {}", cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    /// Module is not part of the pipeline
    #[error("Unknown module '{name}'")]
    UnknownModule { name: String },
}

/// Package discovery errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Packages folder does not exist or is not a directory
    #[error("Packages folder not found: {path}")]
    FolderNotFound { path: PathBuf },

    /// Failed to list the packages folder
    #[error("Failed to list packages folder '{path}': {error}")]
    ListFailed { path: PathBuf, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to copy a file or walk a source tree
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// The shell could not be started
    #[error("Failed to run '{command}' in '{dir}': {error}")]
    Spawn {
        command: String,
        dir: PathBuf,
        error: String,
    },

    /// Waiting on the child process failed
    #[error("Failed to wait for '{command}': {error}")]
    Wait { command: String, error: String },
}

/// Docker Compose document errors
#[derive(Error, Debug)]
pub enum ComposeError {
    /// Document is not valid compose YAML
    #[error("Failed to parse compose file '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// Document could not be serialized
    #[error("Failed to serialize compose document: {error}")]
    Serialize { error: String },

    /// Reading or writing the document failed
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Orchestration errors
#[derive(Error, Debug)]
pub enum ArbiterError {
    /// The arbiter was asked to run before a pipeline was set
    #[error("Pipeline is not installed to the arbiter")]
    PipelineNotInstalled,

    /// A package build exited unsuccessfully and failures are fatal
    #[error("Build failed for module '{module}' (exit code {})", code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    BuildFailed { module: String, code: Option<i32> },

    /// A blocking filesystem task panicked or was cancelled
    #[error("Background task failed: {error}")]
    Task { error: String },

    /// Resolver error
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// Command could not be executed
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    /// Filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// Compose error
    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// Top-level linfra error type
#[derive(Error, Debug)]
pub enum LinfraError {
    /// Resolver error
    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),

    /// Discovery error
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_joins_path() {
        let err = ResolverError::CircularDependency {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
    }

    #[test]
    fn test_build_failed_message() {
        let err = ArbiterError::BuildFailed {
            module: "core".into(),
            code: Some(2),
        };
        assert!(err.to_string().contains("core"));
        assert!(err.to_string().contains('2'));

        let err = ArbiterError::BuildFailed {
            module: "core".into(),
            code: None,
        };
        assert!(err.to_string().contains("unknown"));
    }
}
