//! Path canonicalization and normalization utilities

use crate::error::TreeError;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a directory root (resolves symlinks, `..`, `.`).
///
/// Uses dunce so Windows paths stay free of the `\\?\` prefix.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, TreeError> {
    dunce::canonicalize(path).map_err(|e| {
        TreeError::InvalidPath(format!(
            "Failed to canonicalize path {}: {}",
            path.display(),
            e
        ))
    })
}

/// Stable string key for a path relative to a tree root.
///
/// Components are joined with `/` and Unicode is normalized to NFC, so the
/// same tree produces the same keys on every platform.
pub fn relative_key(path: &Path) -> String {
    let joined = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    joined.nfc().collect()
}

/// Drop `.` components so equivalent relative paths compare equal.
pub fn normalize_relative(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Check that a configured path is relative and names something below its base.
pub fn check_relative(path: &Path) -> Result<(), String> {
    if normalize_relative(path).as_os_str().is_empty() {
        return Err(format!(
            "'{}' must name a directory below the workspace",
            path.display()
        ));
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(format!("{} must not contain '..'", path.display()));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(format!("{} must be relative", path.display()));
            }
        }
    }
    Ok(())
}

/// Check that a name is a single plain path component (no separators).
pub fn check_file_name(name: &str) -> Result<(), String> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(format!("'{}' must be a plain file name", name)),
    }
}
