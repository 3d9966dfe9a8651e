//! Error types for the distmerge build merger.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem tree errors (walking, copying, merging)
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk directory {root:?}: {message}")]
    Walk { root: PathBuf, message: String },

    #[error("Entry kind conflict at {0:?}: a file and a directory share this name")]
    KindConflict(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl TreeError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TreeError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Top-level errors surfaced by the CLI
#[derive(Debug, Error)]
pub enum DistError {
    #[error("Failed to start build for variant '{variant}' ({program}): {source}")]
    BuildSpawn {
        variant: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Build for variant '{variant}' failed with {}", describe_exit(.code))]
    BuildFailed { variant: String, code: Option<i32> },

    #[error("{name} not found in {}", .dir.display())]
    MissingArtifact { name: String, dir: PathBuf },

    #[error("Invalid pipeline transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Tree error: {0}")]
    TreeError(#[from] TreeError),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl DistError {
    /// Process exit status for this error.
    ///
    /// A failed build propagates the subprocess's own code; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            DistError::BuildFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

impl From<config::ConfigError> for DistError {
    fn from(err: config::ConfigError) -> Self {
        DistError::ConfigError(err.to_string())
    }
}
