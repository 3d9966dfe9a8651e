//! CLI parse: clap types for distmerge. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// distmerge - build two front-end variants and merge them into one deployable directory
#[derive(Parser, Debug)]
#[command(name = "distmerge")]
#[command(version, about = "Build two front-end variants and merge their output into one directory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (where the build tool runs)
    #[arg(long, default_value = ".", global = true)]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build both variants, merge their output, and verify the entry files
    Build {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Copy an entry file to the host's entry-point name (default student.html -> index.html)
    Alias {
        /// Existing entry file name
        #[arg(long)]
        source: Option<String>,
        /// Name to copy it to
        #[arg(long)]
        alias: Option<String>,
        /// Directory holding the files (default: the configured dest_dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Check that both variant entry files exist in the merged tree
    Verify {
        /// Directory to check (default: the configured dest_dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Delete and recreate the merged tree
    Clean,
    /// List the entries and digest of a tree
    Inspect {
        /// Directory to inspect (default: the configured dest_dir)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Print the effective configuration as TOML
    Config,
}
