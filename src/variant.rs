//! Application variants and the external build invocation.
//!
//! Each variant is built by running the configured build command once, with
//! the variant id and its output directory handed to the subprocess through
//! two environment variables. The subprocess inherits the rest of the parent
//! environment and its stdio, and the call blocks until it exits.

use crate::error::DistError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Placeholder replaced by the variant id in build arguments.
pub const VARIANT_PLACEHOLDER: &str = "{variant}";

/// Merge order of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantRole {
    /// Built and merged first; wins file collisions at the top level.
    Baseline,
    /// Built and merged second, on top of the baseline.
    Overlay,
}

impl VariantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantRole::Baseline => "baseline",
            VariantRole::Overlay => "overlay",
        }
    }
}

impl fmt::Display for VariantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One buildable variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantConfig {
    /// Variant identifier handed to the build tool (e.g. "student")
    pub id: String,

    /// Temporary output directory, relative to the workspace root
    pub out_dir: PathBuf,
}

impl VariantConfig {
    /// Name of the variant's HTML entry file, `<id>.html`.
    pub fn entry_file(&self) -> String {
        format!("{}.html", self.id)
    }
}

/// The two variants, in merge order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantsConfig {
    pub baseline: VariantConfig,
    pub overlay: VariantConfig,
}

impl VariantsConfig {
    pub fn get(&self, role: VariantRole) -> &VariantConfig {
        match role {
            VariantRole::Baseline => &self.baseline,
            VariantRole::Overlay => &self.overlay,
        }
    }

    /// Entry files that must exist in the merged tree, baseline first.
    pub fn entry_files(&self) -> [String; 2] {
        [self.baseline.entry_file(), self.overlay.entry_file()]
    }
}

/// How to invoke the external build tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCommandConfig {
    /// Program to run (looked up on PATH)
    pub program: String,

    /// Arguments; `{variant}` is replaced by the variant id
    #[serde(default = "default_build_args")]
    pub args: Vec<String>,

    /// Environment variable carrying the variant id
    pub variant_env: String,

    /// Environment variable carrying the output directory name
    pub out_dir_env: String,
}

pub fn default_build_args() -> Vec<String> {
    vec!["run".to_string(), "build:{variant}".to_string()]
}

impl BuildCommandConfig {
    /// Resolve the invocation for one variant.
    pub fn invocation(&self, variant: &VariantConfig, working_dir: &Path) -> BuildInvocation {
        let args = self
            .args
            .iter()
            .map(|arg| arg.replace(VARIANT_PLACEHOLDER, &variant.id))
            .collect();

        let mut env = BTreeMap::new();
        env.insert(self.variant_env.clone(), variant.id.clone());
        env.insert(
            self.out_dir_env.clone(),
            variant.out_dir.to_string_lossy().into_owned(),
        );

        BuildInvocation {
            variant_id: variant.id.clone(),
            out_dir: variant.out_dir.clone(),
            program: self.program.clone(),
            args,
            env,
            working_dir: working_dir.to_path_buf(),
        }
    }
}

/// A fully resolved build subprocess.
///
/// `env` holds only the overrides; everything else is inherited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    pub variant_id: String,
    pub out_dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub working_dir: PathBuf,
}

impl BuildInvocation {
    /// Shell-like rendering for logs and progress output.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs build invocations to completion.
pub trait BuildRunner {
    fn run(&self, invocation: &BuildInvocation) -> Result<(), DistError>;
}

impl<R: BuildRunner + ?Sized> BuildRunner for &R {
    fn run(&self, invocation: &BuildInvocation) -> Result<(), DistError> {
        (**self).run(invocation)
    }
}

/// Runs the build tool as a blocking child process with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandRunner;

impl BuildRunner for CommandRunner {
    fn run(&self, invocation: &BuildInvocation) -> Result<(), DistError> {
        info!(
            variant = %invocation.variant_id,
            out_dir = %invocation.out_dir.display(),
            command = %invocation.command_line(),
            "running build"
        );
        debug!(env = ?invocation.env, working_dir = ?invocation.working_dir, "spawning process");

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(&invocation.env)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| DistError::BuildSpawn {
                variant: invocation.variant_id.clone(),
                program: invocation.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DistError::BuildFailed {
                variant: invocation.variant_id.clone(),
                code: status.code(),
            });
        }

        debug!(variant = %invocation.variant_id, "build finished");
        Ok(())
    }
}
