//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test project context
///
/// A temporary repository root with a `packages/` folder and a `linfra.toml`
/// whose commands only touch files, so builds run without npm or docker.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create `packages/<folder>` with a manifest named after the folder
    pub fn create_package(&self, folder: &str, deps: &[&str]) {
        let deps: Vec<String> = deps.iter().map(|d| format!("\"{d}\": \"^1.0.0\"")).collect();
        self.create_file(
            &format!("packages/{folder}/package.json"),
            &format!(
                r#"{{"name": "{folder}", "version": "1.0.0", "dependencies": {{{}}}}}"#,
                deps.join(", ")
            ),
        );
    }

    /// Write a `linfra.toml` with file-only commands
    ///
    /// The build command appends the package folder name to `build.log`.
    pub fn create_config(&self) {
        self.create_config_with_build(r#"basename \"$PWD\" >> ../../build.log"#);
    }

    /// Write a `linfra.toml` with `build` as the (TOML-escaped) build command
    pub fn create_config_with_build(&self, build: &str) {
        self.create_file(
            "linfra.toml",
            &format!(
                r#"
[commands]
bootstrap = "echo boot >> bootstrap.log"
build = "{build}"
watch = "touch watching"

[docker]
compose_command = "echo"
"#
            ),
        );
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Run linfra in the project directory
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_linfra"))
            .current_dir(self.path())
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("Failed to execute linfra")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Stdout of a finished command
#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished command
#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
