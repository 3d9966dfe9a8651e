//! Global config file source: $XDG_CONFIG_HOME/distmerge/config.toml or ~/.config/distmerge/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::PathBuf;
use tracing::debug;

/// Path to global config file.
pub fn global_config_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
    };
    Some(base.join("distmerge").join("config.toml"))
}

/// Add global config file source to builder if it exists.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(path) = global_config_path() {
        if path.exists() {
            let canonical = dunce::canonicalize(&path).unwrap_or_else(|_| path.clone());
            builder = builder.add_source(File::from(canonical.as_path()).required(false));
        } else {
            debug!(config_path = %path.display(), "no global configuration file");
        }
    }
    Ok(builder)
}
