//! Environment source: DISTMERGE__SECTION__KEY variables.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add the environment override source to builder.
///
/// `DISTMERGE__DEST_DIR=public` sets `dest_dir`;
/// `DISTMERGE__BUILD__ARGS="run build:{variant}"` is split on spaces.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("DISTMERGE")
            .prefix_separator("__")
            .separator("__")
            .list_separator(" ")
            .with_list_parse_key("build.args")
            .try_parsing(true),
    )
}
