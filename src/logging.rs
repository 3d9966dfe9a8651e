//! Logging System
//!
//! Structured logging implementation using the `tracing` crate. Provides configurable
//! log levels, output formats, and destinations.

use crate::error::DistError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::layer::Layered;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Disable logging entirely (`--quiet`)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (if output includes "file"); resolved at startup when unset
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Default log file: `<state dir>/distmerge.log`, falling back to the local data dir.
pub fn default_log_file_path() -> Result<PathBuf, DistError> {
    let dirs = ProjectDirs::from("", "", "distmerge").ok_or_else(|| {
        DistError::LoggingError("Could not determine a home directory for logs".to_string())
    })?;
    let base = dirs
        .state_dir()
        .unwrap_or_else(|| dirs.data_local_dir())
        .to_path_buf();
    Ok(base.join("distmerge.log"))
}

/// Pick the log file: CLI flag, then config file, then the platform default.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, DistError> {
    match cli_file.or(config_file) {
        Some(path) => Ok(path),
        None => default_log_file_path(),
    }
}

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. Environment variables (DISTMERGE_LOG, DISTMERGE_LOG_FORMAT, DISTMERGE_LOG_OUTPUT)
/// 2. CLI arguments, already folded into `config`
/// 3. Configuration file
/// 4. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), DistError> {
    if config.map(|c| !c.enabled).unwrap_or(false) {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let writer = if output.file {
        let log_file = match config.and_then(|c| c.file.clone()) {
            Some(path) => path,
            None => default_log_file_path()?,
        };
        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DistError::LoggingError(format!("Failed to create log directory: {}", e))
            })?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .map_err(|e| {
                DistError::LoggingError(format!("Failed to open log file {:?}: {}", log_file, e))
            })?;
        if output.stderr {
            BoxMakeWriter::new(Mutex::new(file).and(std::io::stderr))
        } else {
            BoxMakeWriter::new(Mutex::new(file))
        }
    } else if output.stdout {
        BoxMakeWriter::new(std::io::stdout)
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    // ANSI escapes only make sense on a terminal stream
    let ansi = use_color && !output.file;

    let layer: BoxedLayer = if format == "json" {
        fmt::layer()
            .json()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed()
    };

    Registry::default()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| DistError::LoggingError(format!("Failed to install subscriber: {}", e)))
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, DistError> {
    if let Ok(filter) = EnvFilter::try_from_env("DISTMERGE_LOG") {
        return Ok(filter);
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("warn");

    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(level);

    if let Some(config) = config {
        for (module, module_level) in &config.modules {
            let directive = format!("{}={}", module, module_level);
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e| DistError::LoggingError(format!("Invalid log directive: {}", e)))?,
            );
        }
    }

    Ok(filter)
}

/// Determine output format from config or environment
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, DistError> {
    if let Ok(format) = std::env::var("DISTMERGE_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    let format = config.map(|c| c.format.as_str()).unwrap_or("text");

    if format != "json" && format != "text" {
        return Err(DistError::LoggingError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format.to_string())
}

/// Output destinations
#[derive(Debug)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

/// Determine output destinations from config or environment
fn determine_output(config: Option<&LoggingConfig>) -> Result<OutputDestinations, DistError> {
    if let Ok(output) = std::env::var("DISTMERGE_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }

    let output = config.map(|c| c.output.as_str()).unwrap_or("stderr");

    parse_output_destinations(output)
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, DistError> {
    match output {
        "stdout" => Ok(OutputDestinations {
            stdout: true,
            stderr: false,
            file: false,
        }),
        "stderr" => Ok(OutputDestinations {
            stdout: false,
            stderr: true,
            file: false,
        }),
        "file" => Ok(OutputDestinations {
            stdout: false,
            stderr: false,
            file: true,
        }),
        "file+stderr" => Ok(OutputDestinations {
            stdout: false,
            stderr: true,
            file: true,
        }),
        _ => Err(DistError::LoggingError(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'file+stderr')",
            output
        ))),
    }
}
