//! Build-and-merge pipeline.
//!
//! The run is an explicit state machine:
//!
//! ```text
//! Start -> Prepared -> BaselineBuilt -> BaselineMerged
//!       -> OverlayBuilt -> OverlayMerged -> Verified -> Done
//! ```
//!
//! Any failing step, or a step invoked out of order, moves the pipeline to
//! `Failed`, from which nothing can continue. There are no retries.

use crate::config::DistConfig;
use crate::error::DistError;
use crate::merge::{self, MergeReport};
use crate::tree::hasher;
use crate::tree::path::check_relative;
use crate::variant::{BuildRunner, VariantRole};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info};

/// Pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Start,
    Prepared,
    BaselineBuilt,
    BaselineMerged,
    OverlayBuilt,
    OverlayMerged,
    Verified,
    Done,
    Failed,
}

impl Stage {
    /// The only stage reachable from this one on success.
    pub fn successor(self) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::Prepared),
            Stage::Prepared => Some(Stage::BaselineBuilt),
            Stage::BaselineBuilt => Some(Stage::BaselineMerged),
            Stage::BaselineMerged => Some(Stage::OverlayBuilt),
            Stage::OverlayBuilt => Some(Stage::OverlayMerged),
            Stage::OverlayMerged => Some(Stage::Verified),
            Stage::Verified => Some(Stage::Done),
            Stage::Done | Stage::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.successor().is_none()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Prepared => "prepared",
            Stage::BaselineBuilt => "baseline_built",
            Stage::BaselineMerged => "baseline_merged",
            Stage::OverlayBuilt => "overlay_built",
            Stage::OverlayMerged => "overlay_merged",
            Stage::Verified => "verified",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }

    fn built(role: VariantRole) -> Stage {
        match role {
            VariantRole::Baseline => Stage::BaselineBuilt,
            VariantRole::Overlay => Stage::OverlayBuilt,
        }
    }

    fn merged(role: VariantRole) -> Stage {
        match role {
            VariantRole::Baseline => Stage::BaselineMerged,
            VariantRole::Overlay => Stage::OverlayMerged,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase transitions surfaced to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Preparing { dest: PathBuf },
    Building { role: VariantRole, variant: String, command: String },
    Merging { role: VariantRole, variant: String },
    Verifying { files: Vec<String> },
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSummary {
    pub dest: PathBuf,
    pub entry_files: Vec<String>,
    pub baseline: MergeReport,
    pub overlay: MergeReport,
    pub digest: String,
    pub finished_at: String,
}

type Observer<'a> = Box<dyn FnMut(&ProgressEvent) + 'a>;

/// Drives one build-and-merge run.
pub struct Pipeline<'a, R: BuildRunner> {
    workspace_root: PathBuf,
    config: &'a DistConfig,
    runner: R,
    stage: Stage,
    baseline_report: Option<MergeReport>,
    overlay_report: Option<MergeReport>,
    observer: Option<Observer<'a>>,
}

impl<'a, R: BuildRunner> Pipeline<'a, R> {
    pub fn new(workspace_root: impl Into<PathBuf>, config: &'a DistConfig, runner: R) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            config,
            runner,
            stage: Stage::Start,
            baseline_report: None,
            overlay_report: None,
            observer: None,
        }
    }

    /// Receive a callback at each phase transition.
    pub fn with_observer(mut self, observer: impl FnMut(&ProgressEvent) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Absolute path of the merged tree.
    pub fn dest(&self) -> PathBuf {
        self.workspace_root.join(&self.config.dest_dir)
    }

    fn out_dir(&self, role: VariantRole) -> PathBuf {
        self.workspace_root.join(&self.config.variants.get(role).out_dir)
    }

    fn emit(&mut self, event: ProgressEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }

    /// Run `step` as the transition into `to`, guarding order and recording failure.
    fn transition<T>(
        &mut self,
        to: Stage,
        step: impl FnOnce(&mut Self) -> Result<T, DistError>,
    ) -> Result<T, DistError> {
        if self.stage.successor() != Some(to) {
            let err = DistError::InvalidTransition {
                from: self.stage.to_string(),
                to: to.to_string(),
            };
            self.stage = Stage::Failed;
            return Err(err);
        }

        match step(self) {
            Ok(value) => {
                info!(stage = %to, "pipeline advanced");
                self.stage = to;
                Ok(value)
            }
            Err(e) => {
                error!(from = %self.stage, to = %to, error = %e, "pipeline failed");
                self.stage = Stage::Failed;
                Err(e)
            }
        }
    }

    /// Delete and recreate the merged tree.
    pub fn prepare(&mut self) -> Result<(), DistError> {
        self.transition(Stage::Prepared, |p| {
            check_relative(&p.config.dest_dir)
                .map_err(|e| DistError::ConfigError(format!("dest_dir: {}", e)))?;
            let dest = p.dest();
            p.emit(ProgressEvent::Preparing { dest: dest.clone() });
            merge::prepare(&dest)?;
            Ok(())
        })
    }

    /// Run the build tool for one variant; blocks until it exits.
    pub fn build(&mut self, role: VariantRole) -> Result<(), DistError> {
        self.transition(Stage::built(role), |p| {
            let config = p.config;
            let variant = config.variants.get(role);
            let invocation = config.build.invocation(variant, &p.workspace_root);
            p.emit(ProgressEvent::Building {
                role,
                variant: variant.id.clone(),
                command: invocation.command_line(),
            });
            p.runner.run(&invocation)
        })
    }

    /// Merge one variant's output tree into the merged tree and delete it.
    pub fn merge(&mut self, role: VariantRole) -> Result<MergeReport, DistError> {
        self.transition(Stage::merged(role), |p| {
            let variant = p.config.variants.get(role).clone();
            let id = variant.id.clone();
            let entry_file = variant.entry_file();
            p.emit(ProgressEvent::Merging {
                role,
                variant: id.clone(),
            });

            let src = p.out_dir(role);
            let dest = p.dest();
            let report = match role {
                VariantRole::Baseline => merge::merge_baseline(&src, &dest, &id)?,
                VariantRole::Overlay => merge::merge_overlay(&src, &dest, &id, &entry_file)?,
            };
            match role {
                VariantRole::Baseline => p.baseline_report = Some(report.clone()),
                VariantRole::Overlay => p.overlay_report = Some(report.clone()),
            }
            Ok(report)
        })
    }

    /// Check both variant entry files are present.
    pub fn verify(&mut self) -> Result<(), DistError> {
        self.transition(Stage::Verified, |p| {
            let files = p.config.variants.entry_files();
            p.emit(ProgressEvent::Verifying {
                files: files.to_vec(),
            });
            merge::verify(&p.dest(), &files)
        })
    }

    /// Close the run and summarize it.
    pub fn finish(&mut self) -> Result<BuildSummary, DistError> {
        self.transition(Stage::Done, |p| {
            let dest = p.dest();
            let digest = hasher::compute_tree_digest(&dest)?;
            Ok(BuildSummary {
                entry_files: p.config.variants.entry_files().to_vec(),
                baseline: p.baseline_report.clone().unwrap_or_default(),
                overlay: p.overlay_report.clone().unwrap_or_default(),
                digest: hasher::to_hex(&digest),
                finished_at: chrono::Utc::now().to_rfc3339(),
                dest,
            })
        })
    }

    /// Run every step in order.
    pub fn run(mut self) -> Result<BuildSummary, DistError> {
        self.prepare()?;
        self.build(VariantRole::Baseline)?;
        self.merge(VariantRole::Baseline)?;
        self.build(VariantRole::Overlay)?;
        self.merge(VariantRole::Overlay)?;
        self.verify()?;
        self.finish()
    }
}
