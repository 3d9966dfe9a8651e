//! Workspace config file source: distmerge.toml and distmerge.{env}.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};

/// Base workspace config file name.
pub const WORKSPACE_CONFIG_FILE: &str = "distmerge.toml";

pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_CONFIG_FILE)
}

/// Add workspace config files to builder.
/// Precedence: distmerge.toml (base) then distmerge.{DISTMERGE_ENV}.toml (env-specific).
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = builder;

    let base_config_path = workspace_config_path(workspace_root);
    if base_config_path.exists() {
        builder = builder.add_source(File::from(base_config_path.as_path()).required(false));
    }

    if let Ok(env_name) = std::env::var("DISTMERGE_ENV") {
        let env_config_path = workspace_root.join(format!("distmerge.{}.toml", env_name));
        if env_config_path.exists() {
            builder = builder.add_source(File::from(env_config_path.as_path()).required(false));
        }
    }

    Ok(builder)
}
