//! Entry-point aliasing for static hosts.
//!
//! Hosts that serve `index.html` as the site root need one variant's entry
//! file duplicated under that name. This runs independently of a build, on
//! whatever merged tree already exists.

use crate::error::DistError;
use crate::tree::copy::copy_file;
use crate::tree::path::check_file_name;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Which file to duplicate and under what name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    /// Existing entry file (e.g. "student.html")
    pub source: String,
    /// Platform entry-point name (e.g. "index.html")
    pub target: String,
}

impl AliasConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_file_name(&self.source)?;
        check_file_name(&self.target)?;
        if self.source == self.target {
            return Err(format!(
                "source and target are both '{}'",
                self.source
            ));
        }
        Ok(())
    }
}

/// Result of a successful alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasOutcome {
    pub source: PathBuf,
    pub target: PathBuf,
    pub bytes: u64,
}

/// Copy `dir/source` to `dir/target`, overwriting the target.
///
/// Fails without touching `dir` when the source file is absent.
pub fn alias(dir: &Path, source: &str, target: &str) -> Result<AliasOutcome, DistError> {
    let source_path = dir.join(source);
    if !source_path.is_file() {
        return Err(DistError::MissingArtifact {
            name: source.to_string(),
            dir: dir.to_path_buf(),
        });
    }

    let target_path = dir.join(target);
    let bytes = copy_file(&source_path, &target_path)?;
    info!(source, target, bytes, "entry point aliased");

    Ok(AliasOutcome {
        source: source_path,
        target: target_path,
        bytes,
    })
}
