//! Distmerge CLI Binary
//!
//! Builds both front-end variants and merges them into one deployable tree.

use clap::Parser;
use distmerge::cli::{map_error, Cli, RunContext};
use distmerge::config::ConfigLoader;
use distmerge::logging::{init_logging, resolve_log_file_path, LoggingConfig};
use std::process;
use tracing::{error, info, info_span};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("distmerge starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading workspace: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(e.exit_code());
        }
    };

    let span = info_span!("command", name = distmerge::cli::command_name(&cli.command));
    let _guard = span.enter();

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(e.exit_code());
        }
    }
}

/// Build logging configuration from CLI args and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.workspace)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
        if config.output == "file" {
            config.output = "file+stderr".to_string();
        }
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }

    let output_uses_file = config.output == "file" || config.output == "file+stderr";
    if config.enabled && output_uses_file {
        if let Ok(path) = resolve_log_file_path(cli.log_file.clone(), config.file.clone()) {
            config.file = Some(path);
        }
    } else if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
