//! Configuration System
//!
//! Layered configuration for the build merger: built-in defaults, then the
//! global user file, then the workspace file, then `DISTMERGE__*` environment
//! variables. A single explicit file can replace the file layers.

use crate::error::DistError;
use crate::tree::path::{check_file_name, check_relative, normalize_relative};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::alias::AliasConfig;
pub use crate::logging::LoggingConfig;
pub use crate::variant::{BuildCommandConfig, VariantConfig, VariantsConfig};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::{workspace_config_path, WORKSPACE_CONFIG_FILE};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistConfig {
    /// Merged tree, relative to the workspace root
    pub dest_dir: PathBuf,

    /// External build command
    pub build: BuildCommandConfig,

    /// The two variants, in merge order
    pub variants: VariantsConfig,

    /// Entry-point alias
    pub alias: AliasConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DistConfig {
    fn default() -> Self {
        Self {
            dest_dir: PathBuf::from("dist"),
            build: BuildCommandConfig {
                program: "npm".to_string(),
                args: crate::variant::default_build_args(),
                variant_env: "VITE_APP_TYPE".to_string(),
                out_dir_env: "BUILD_OUT_DIR".to_string(),
            },
            variants: VariantsConfig {
                baseline: VariantConfig {
                    id: "student".to_string(),
                    out_dir: PathBuf::from("dist-student-temp"),
                },
                overlay: VariantConfig {
                    id: "admin".to_string(),
                    out_dir: PathBuf::from("dist-admin-temp"),
                },
            },
            alias: AliasConfig {
                source: "student.html".to_string(),
                target: "index.html".to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Build(String),
    Variant(String, String),
    Paths(String),
    Alias(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Build(msg) => write!(f, "Build: {}", msg),
            ValidationError::Variant(role, msg) => write!(f, "Variant '{}': {}", role, msg),
            ValidationError::Paths(msg) => write!(f, "Paths: {}", msg),
            ValidationError::Alias(msg) => write!(f, "Alias: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl BuildCommandConfig {
    /// Validate build command configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.program.trim().is_empty() {
            return Err("program cannot be empty".to_string());
        }
        if self.variant_env.is_empty() || self.out_dir_env.is_empty() {
            return Err("environment variable names cannot be empty".to_string());
        }
        if self.variant_env == self.out_dir_env {
            return Err(format!(
                "variant_env and out_dir_env are both '{}'",
                self.variant_env
            ));
        }
        Ok(())
    }
}

impl VariantConfig {
    /// Validate a single variant
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("id cannot be empty".to_string());
        }
        check_file_name(&self.entry_file())?;
        check_relative(&self.out_dir)
    }
}

impl DistConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.build.validate() {
            errors.push(ValidationError::Build(e));
        }

        for (role, variant) in [
            ("baseline", &self.variants.baseline),
            ("overlay", &self.variants.overlay),
        ] {
            if let Err(e) = variant.validate() {
                errors.push(ValidationError::Variant(role.to_string(), e));
            }
        }

        if self.variants.baseline.id == self.variants.overlay.id {
            errors.push(ValidationError::Variant(
                "overlay".to_string(),
                format!("id '{}' duplicates the baseline id", self.variants.overlay.id),
            ));
        }

        if let Err(e) = check_relative(&self.dest_dir) {
            errors.push(ValidationError::Paths(format!("dest_dir: {}", e)));
        }

        let dirs = [
            ("dest_dir", &self.dest_dir),
            ("baseline out_dir", &self.variants.baseline.out_dir),
            ("overlay out_dir", &self.variants.overlay.out_dir),
        ];
        let normalized: Vec<PathBuf> = dirs.iter().map(|(_, p)| normalize_relative(p)).collect();
        for (i, (name_a, a)) in dirs.iter().enumerate() {
            for (j, (name_b, b)) in dirs.iter().enumerate().skip(i + 1) {
                let (norm_a, norm_b) = (&normalized[i], &normalized[j]);
                if norm_a.starts_with(norm_b) || norm_b.starts_with(norm_a) {
                    errors.push(ValidationError::Paths(format!(
                        "{} ({}) and {} ({}) overlap",
                        name_a,
                        a.display(),
                        name_b,
                        b.display()
                    )));
                }
            }
        }

        if let Err(e) = self.alias.validate() {
            errors.push(ValidationError::Alias(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Effective configuration rendered as TOML.
    pub fn to_toml(&self) -> Result<String, DistError> {
        toml::to_string_pretty(self).map_err(|e| DistError::ConfigError(e.to_string()))
    }
}
