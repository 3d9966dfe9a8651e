//! Merging variant output trees into the merged tree.
//!
//! The baseline tree is deep-copied into an empty destination. The overlay
//! tree is then laid on top one level at a time:
//!
//! - a directory that already exists in the destination is merged one level
//!   deep, overlay children overwriting same-named children;
//! - a directory with no counterpart is deep-copied;
//! - a file is copied only when the destination has no entry of that name,
//!   except the overlay's reserved entry file, which always overwrites.
//!
//! Nested directories inside a shared directory are never reconciled: an
//! overlay child directory replaces the destination child wholesale.

use crate::error::{DistError, TreeError};
use crate::tree::copy::{copy_file, copy_tree, ensure_dir, remove_path};
use crate::tree::path::relative_key;
use crate::tree::walker::{Entry, Walker, WalkerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// What one merge step did to the merged tree. Paths are relative keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    pub variant: String,
    /// Files written where the destination had no entry
    pub copied: Vec<String>,
    /// Files written over an existing destination file
    pub overwritten: Vec<String>,
    /// Files left out because the destination already had them
    pub skipped: Vec<String>,
    /// Nested directories replaced wholesale inside a shared directory
    pub replaced_dirs: Vec<String>,
    /// The output tree did not exist, so nothing was merged
    pub source_missing: bool,
}

impl MergeReport {
    fn new(variant: &str) -> Self {
        Self {
            variant: variant.to_string(),
            ..Self::default()
        }
    }

    /// Number of files written into the merged tree.
    pub fn written(&self) -> usize {
        self.copied.len() + self.overwritten.len()
    }
}

/// Delete any existing merged tree and create it empty.
pub fn prepare(dest: &Path) -> Result<(), TreeError> {
    remove_path(dest)?;
    ensure_dir(dest)?;
    debug!(dest = %dest.display(), "merged tree prepared");
    Ok(())
}

/// Deep-copy the baseline output tree into `dest`, then delete it.
pub fn merge_baseline(src: &Path, dest: &Path, variant: &str) -> Result<MergeReport, TreeError> {
    let mut report = MergeReport::new(variant);
    if !src.is_dir() {
        warn!(variant, src = %src.display(), "output tree missing, nothing to merge");
        report.source_missing = true;
        return Ok(report);
    }

    for path in copy_tree(src, dest)? {
        report.copied.push(relative_key(&path));
    }
    remove_path(src)?;

    info!(variant, files = report.copied.len(), "baseline merged");
    Ok(report)
}

/// Lay the overlay output tree on top of `dest`, then delete it.
///
/// `reserved_entry` is the overlay's own entry file name, which is always
/// copied even when the destination already has a file of that name.
pub fn merge_overlay(
    src: &Path,
    dest: &Path,
    variant: &str,
    reserved_entry: &str,
) -> Result<MergeReport, TreeError> {
    let mut report = MergeReport::new(variant);
    if !src.is_dir() {
        warn!(variant, src = %src.display(), "output tree missing, nothing to merge");
        report.source_missing = true;
        return Ok(report);
    }
    let reserved_key = relative_key(Path::new(reserved_entry));

    for entry in Walker::with_config(src, WalkerConfig::children()).walk()? {
        let name = entry.path().to_path_buf();
        let target = dest.join(&name);
        match entry {
            Entry::Directory { .. } => {
                if target.is_dir() {
                    merge_shared_dir(&src.join(&name), &target, &name, &mut report)?;
                } else if target.exists() {
                    return Err(TreeError::KindConflict(name));
                } else {
                    for path in copy_tree(&src.join(&name), &target)? {
                        report.copied.push(relative_key(&name.join(path)));
                    }
                }
            }
            Entry::File { .. } => {
                let key = relative_key(&name);
                let reserved = key == reserved_key;
                let existed = target.exists();
                if reserved || !existed {
                    copy_file(&src.join(&name), &target)?;
                    if existed {
                        report.overwritten.push(key);
                    } else {
                        report.copied.push(key);
                    }
                } else {
                    debug!(path = %key, "baseline file kept");
                    report.skipped.push(key);
                }
            }
        }
    }
    remove_path(src)?;

    info!(
        variant,
        copied = report.copied.len(),
        overwritten = report.overwritten.len(),
        skipped = report.skipped.len(),
        "overlay merged"
    );
    Ok(report)
}

/// One-level merge of a directory present in both trees.
fn merge_shared_dir(
    src_dir: &Path,
    dest_dir: &Path,
    prefix: &Path,
    report: &mut MergeReport,
) -> Result<(), TreeError> {
    for child in Walker::with_config(src_dir, WalkerConfig::children()).walk()? {
        let relative = prefix.join(child.path());
        let target = dest_dir.join(child.path());
        match child {
            Entry::File { path, .. } => {
                let existed = target.exists();
                copy_file(&src_dir.join(&path), &target).map_err(|e| match e {
                    TreeError::KindConflict(_) => TreeError::KindConflict(relative.clone()),
                    other => other,
                })?;
                if existed {
                    report.overwritten.push(relative_key(&relative));
                } else {
                    report.copied.push(relative_key(&relative));
                }
            }
            Entry::Directory { path } => {
                if target.exists() {
                    warn!(
                        path = %relative_key(&relative),
                        "nested directory exists in both variants; replacing it with the overlay copy"
                    );
                    remove_path(&target)?;
                    report.replaced_dirs.push(relative_key(&relative));
                }
                for file in copy_tree(&src_dir.join(&path), &target)? {
                    report.copied.push(relative_key(&relative.join(file)));
                }
            }
        }
    }
    Ok(())
}

/// Check that every required entry file exists in the merged tree.
///
/// Files are checked in order; the first missing one is reported.
pub fn verify<S: AsRef<str>>(dest: &Path, required: &[S]) -> Result<(), DistError> {
    for name in required {
        let name = name.as_ref();
        if !dest.join(name).is_file() {
            return Err(DistError::MissingArtifact {
                name: name.to_string(),
                dir: dest.to_path_buf(),
            });
        }
        debug!(file = name, "entry file present");
    }
    Ok(())
}
