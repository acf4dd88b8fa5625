//! Filesystem operations
//!
//! Handles file and directory operations.

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a file, a symlink or a directory tree
///
/// Missing paths are not an error. Symlinks are unlinked, never followed.
pub fn remove_path(path: &Path) -> Result<(), FilesystemError> {
    let Ok(meta) = std::fs::symlink_metadata(path) else {
        return Ok(());
    };

    let result = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    result.map_err(|e| FilesystemError::RemoveDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove the empty directories between `path` and `stop`
///
/// Walks up from the parent of `path` and stops at the first folder that is
/// not empty, or at `stop`, which is never removed. Folders outside `stop`
/// are left alone.
pub fn prune_empty_parents(path: &Path, stop: &Path) {
    let mut current = path.parent();
    while let Some(dir) = current {
        if dir == stop || !dir.starts_with(stop) {
            break;
        }
        // Only succeeds on an empty folder
        if std::fs::remove_dir(dir).is_err() {
            break;
        }
        current = dir.parent();
    }
}

/// Write content to a file
pub fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Whether `path` is an existing directory
pub fn is_directory(path: &Path) -> bool {
    path.is_dir()
}

/// Whether `path` is an existing regular file
pub async fn has_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Resolve `path` against the current directory
///
/// `.` components are dropped and `..` pops the previous component. Symlinks
/// are left untouched.
pub fn absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Last component of `path`
pub fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Immediate subfolders of `path`, sorted by name
pub fn subfolders(path: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if entry.path().is_dir() {
            folders.push(entry.path());
        }
    }
    folders.sort();
    Ok(folders)
}

/// Recursively copy `from` into `to`
///
/// Entries whose name is in `skip` are not copied, at any depth. Symlinks are
/// copied as the files they point at.
pub fn copy_dir_all(from: &Path, to: &Path, skip: &[&str]) -> Result<(), FilesystemError> {
    let copy_err = |error: String| FilesystemError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        error,
    };

    create_dir_all(to)?;

    let walker = WalkDir::new(from)
        .follow_links(true)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !skip.iter().any(|s| *s == name)
        });

    for entry in walker {
        let entry = entry.map_err(|e| copy_err(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| copy_err(e.to_string()))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| FilesystemError::Copy {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                error: e.to_string(),
            })?;
        }
    }

    Ok(())
}
