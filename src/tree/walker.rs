//! Filesystem walker for traversing output trees

use crate::error::TreeError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filesystem entry types. Paths are relative to the walked root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A file entry with its path and size
    File { path: PathBuf, size: u64 },
    /// A directory entry with its path
    Directory { path: PathBuf },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::File { path, .. } | Entry::Directory { path } => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Directory { .. })
    }
}

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links.
    ///
    /// When false, symlinks are skipped entirely.
    pub follow_symlinks: bool,
    /// Maximum depth to traverse (None = unlimited, 1 = direct children only)
    pub max_depth: Option<usize>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            max_depth: None,
        }
    }
}

impl WalkerConfig {
    /// Direct children of the root only.
    pub fn children() -> Self {
        Self {
            max_depth: Some(1),
            ..Self::default()
        }
    }
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: impl Into<PathBuf>, config: WalkerConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree and collect all entries below the root
    ///
    /// Returns entries sorted by path for determinism.
    pub fn walk(&self) -> Result<Vec<Entry>, TreeError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX));

        for entry in walker {
            let entry = entry.map_err(|e| TreeError::Walk {
                root: self.root.clone(),
                message: e.to_string(),
            })?;

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| TreeError::InvalidPath(e.to_string()))?
                .to_path_buf();

            let metadata = entry
                .metadata()
                .map_err(|e| TreeError::Walk {
                    root: self.root.clone(),
                    message: format!("Failed to read metadata for {:?}: {}", entry.path(), e),
                })?;

            if metadata.is_file() {
                entries.push(Entry::File {
                    path: relative,
                    size: metadata.len(),
                });
            } else if metadata.is_dir() {
                entries.push(Entry::Directory { path: relative });
            }
            // Skip symlinks if not following them
        }

        entries.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(entries)
    }
}
