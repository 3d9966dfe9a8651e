//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::alias;
use crate::cli::parse::Commands;
use crate::cli::presentation;
use crate::config::{ConfigLoader, DistConfig};
use crate::error::DistError;
use crate::merge;
use crate::pipeline::Pipeline;
use crate::tree::listing::list_tree;
use crate::tree::path::{canonicalize_path, check_relative};
use crate::variant::{BuildRunner, CommandRunner};
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime context for CLI execution: workspace root and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: DistConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, DistError> {
        let workspace_root = canonicalize_path(&workspace_root)?;
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self::with_config(workspace_root, config))
    }

    /// Run context over an already-loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: DistConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &DistConfig {
        &self.config
    }

    /// Resolve an optional directory flag, defaulting to the merged tree.
    fn target_dir(&self, dir: Option<&PathBuf>) -> PathBuf {
        match dir {
            Some(dir) => self.workspace_root.join(dir),
            None => self.workspace_root.join(&self.config.dest_dir),
        }
    }

    /// Execute a command with the real build tool.
    pub fn execute(&self, command: &Commands) -> Result<String, DistError> {
        self.execute_with(command, CommandRunner)
    }

    /// Execute a command, running builds through `runner`.
    pub fn execute_with<R: BuildRunner>(
        &self,
        command: &Commands,
        runner: R,
    ) -> Result<String, DistError> {
        match command {
            Commands::Build { format } => self.handle_build(format, runner),
            Commands::Alias { source, alias, dir } => {
                self.handle_alias(source.as_deref(), alias.as_deref(), dir.as_ref())
            }
            Commands::Verify { dir } => self.handle_verify(dir.as_ref()),
            Commands::Clean => self.handle_clean(),
            Commands::Inspect { dir, format } => self.handle_inspect(dir.as_ref(), format),
            Commands::Config => self.config.to_toml(),
        }
    }

    fn handle_build<R: BuildRunner>(&self, format: &str, runner: R) -> Result<String, DistError> {
        let json = format == "json";
        let summary = Pipeline::new(&self.workspace_root, &self.config, runner)
            .with_observer(|event| {
                // Progress goes to stderr in json mode so stdout stays parseable
                let line = presentation::format_progress(event);
                if json {
                    eprintln!("{}", line);
                } else {
                    println!("{}", line);
                }
            })
            .run()?;

        info!(digest = %summary.digest, "build complete");
        if json {
            presentation::format_build_summary_json(&summary)
        } else {
            Ok(presentation::format_build_summary_text(&summary))
        }
    }

    fn handle_alias(
        &self,
        source: Option<&str>,
        target: Option<&str>,
        dir: Option<&PathBuf>,
    ) -> Result<String, DistError> {
        let source = source.unwrap_or(&self.config.alias.source);
        let target = target.unwrap_or(&self.config.alias.target);
        let dir = self.target_dir(dir);
        let outcome = alias::alias(&dir, source, target)?;
        Ok(presentation::format_alias_outcome(&outcome))
    }

    fn handle_verify(&self, dir: Option<&PathBuf>) -> Result<String, DistError> {
        let dir = self.target_dir(dir);
        let files = self.config.variants.entry_files();
        merge::verify(&dir, &files)?;
        Ok(presentation::format_verify_ok(&dir, &files))
    }

    fn handle_clean(&self) -> Result<String, DistError> {
        check_relative(&self.config.dest_dir)
            .map_err(|e| DistError::ConfigError(format!("dest_dir: {}", e)))?;
        let dest = self.target_dir(None);
        merge::prepare(&dest)?;
        Ok(format!("Cleaned {}", dest.display()))
    }

    fn handle_inspect(&self, dir: Option<&PathBuf>, format: &str) -> Result<String, DistError> {
        let dir = self.target_dir(dir);
        if !dir.is_dir() {
            return Err(DistError::MissingArtifact {
                name: dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| dir.display().to_string()),
                dir: self.workspace_root.clone(),
            });
        }
        let listing = list_tree(&dir)?;
        if format == "json" {
            presentation::format_listing_json(&listing)
        } else {
            Ok(presentation::format_listing_text(&listing))
        }
    }
}
