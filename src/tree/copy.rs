//! Copy and removal primitives for output trees

use crate::error::TreeError;
use crate::tree::walker::{Entry, Walker};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Recursively copy every entry of `src` into `dest`.
///
/// Directories are created as needed and files are copied byte-for-byte,
/// overwriting existing files. Returns the relative paths of copied files.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<Vec<PathBuf>, TreeError> {
    ensure_dir(dest)?;

    let mut copied = Vec::new();
    for entry in Walker::new(src).walk()? {
        let target = dest.join(entry.path());
        match entry {
            Entry::Directory { path } => {
                ensure_dir(&target).map_err(|e| match e {
                    TreeError::KindConflict(_) => TreeError::KindConflict(path),
                    other => other,
                })?;
            }
            Entry::File { path, .. } => {
                copy_file(&src.join(&path), &target)?;
                copied.push(path);
            }
        }
    }

    Ok(copied)
}

/// Copy a single file, overwriting the target.
pub fn copy_file(src: &Path, dest: &Path) -> Result<u64, TreeError> {
    if dest.is_dir() {
        return Err(TreeError::KindConflict(dest.to_path_buf()));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| TreeError::io(parent, e))?;
    }
    trace!(src = %src.display(), dest = %dest.display(), "copy file");
    fs::copy(src, dest).map_err(|e| TreeError::io(src, e))
}

/// Remove a file or directory tree. A missing path is not an error.
pub fn remove_path(path: &Path) -> Result<(), TreeError> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TreeError::io(path, e)),
    }
}

/// Create a directory (and parents) unless it already exists as a directory.
pub fn ensure_dir(path: &Path) -> Result<(), TreeError> {
    if path.exists() && !path.is_dir() {
        return Err(TreeError::KindConflict(path.to_path_buf()));
    }
    fs::create_dir_all(path).map_err(|e| TreeError::io(path, e))
}
