//! Flat listing of a tree for `distmerge inspect`.

use crate::error::TreeError;
use crate::tree::hasher;
use crate::tree::path::relative_key;
use crate::tree::walker::{Entry, Walker};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub path: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeListing {
    pub root: PathBuf,
    pub entries: Vec<ListingEntry>,
    pub files: usize,
    pub directories: usize,
    pub total_bytes: u64,
    pub digest: String,
}

/// Walk `root` and summarize it.
pub fn list_tree(root: &Path) -> Result<TreeListing, TreeError> {
    let mut listing = TreeListing {
        root: root.to_path_buf(),
        entries: Vec::new(),
        files: 0,
        directories: 0,
        total_bytes: 0,
        digest: hasher::to_hex(&hasher::compute_tree_digest(root)?),
    };

    for entry in Walker::new(root).walk()? {
        let path = relative_key(entry.path());
        match entry {
            Entry::File { size, .. } => {
                listing.files += 1;
                listing.total_bytes += size;
                listing.entries.push(ListingEntry {
                    path,
                    kind: "file".to_string(),
                    size: Some(size),
                });
            }
            Entry::Directory { .. } => {
                listing.directories += 1;
                listing.entries.push(ListingEntry {
                    path,
                    kind: "directory".to_string(),
                    size: None,
                });
            }
        }
    }

    Ok(listing)
}
