//! Content digest of a tree using BLAKE3

use crate::error::TreeError;
use crate::tree::path;
use crate::tree::walker::{Entry, Walker};
use blake3::Hasher;
use std::fs;
use std::path::Path;

pub type Hash = [u8; 32];

/// Compute content hash for file bytes
pub fn compute_content_hash(content: &[u8]) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(content);
    *hasher.finalize().as_bytes()
}

/// Compute the digest of a whole tree.
///
/// digest = hash(for each entry sorted by key: kind || key_len || key || content_hash)
///
/// Keys are normalized relative paths, so the digest depends only on the
/// names and bytes inside the tree, never on where the tree lives.
pub fn compute_tree_digest(root: &Path) -> Result<Hash, TreeError> {
    let mut keyed: Vec<(String, Entry)> = Walker::new(root)
        .walk()?
        .into_iter()
        .map(|entry| (path::relative_key(entry.path()), entry))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Hasher::new();
    for (key, entry) in &keyed {
        let key_bytes = key.as_bytes();
        match entry {
            Entry::Directory { .. } => {
                hasher.update(b"directory");
                hasher.update(&(key_bytes.len() as u64).to_be_bytes());
                hasher.update(key_bytes);
            }
            Entry::File { path, .. } => {
                let full = root.join(path);
                let content = fs::read(&full).map_err(|e| TreeError::io(&full, e))?;
                hasher.update(b"file");
                hasher.update(&(key_bytes.len() as u64).to_be_bytes());
                hasher.update(key_bytes);
                hasher.update(&compute_content_hash(&content));
            }
        }
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Hex form of a digest, as printed by the CLI.
pub fn to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}
