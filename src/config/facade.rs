//! Config loader: assembles sources in precedence order and validates the result.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::DistConfig;
use crate::error::DistError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads `DistConfig` from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// files, `DISTMERGE__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<DistConfig, DistError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: DistConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "configuration loaded");
        Self::validated(config)
    }

    /// Load configuration from one explicit file on top of the defaults.
    pub fn load_from_file(path: &Path) -> Result<DistConfig, DistError> {
        if !path.is_file() {
            return Err(DistError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let config: DistConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        debug!(config_path = %path.display(), "configuration loaded");
        Self::validated(config)
    }

    /// Global config path, if a home directory is known.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn validated(config: DistConfig) -> Result<DistConfig, DistError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            DistError::ConfigError(messages.join("; "))
        })?;
        Ok(config)
    }
}
