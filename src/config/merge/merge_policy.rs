//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Every later source (global file, workspace file, environment) overrides
/// these key by key.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("dest_dir", "dist")?
        .set_default("build.program", "npm")?
        .set_default("build.args", vec!["run", "build:{variant}"])?
        .set_default("build.variant_env", "VITE_APP_TYPE")?
        .set_default("build.out_dir_env", "BUILD_OUT_DIR")?
        .set_default("variants.baseline.id", "student")?
        .set_default("variants.baseline.out_dir", "dist-student-temp")?
        .set_default("variants.overlay.id", "admin")?
        .set_default("variants.overlay.out_dir", "dist-admin-temp")?
        .set_default("alias.source", "student.html")?
        .set_default("alias.target", "index.html")
}
