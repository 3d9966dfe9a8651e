//! CLI presentation: text and json formatters per command.

use crate::alias::AliasOutcome;
use crate::error::DistError;
use crate::merge::MergeReport;
use crate::pipeline::{BuildSummary, ProgressEvent};
use crate::tree::listing::TreeListing;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::Path;

/// One console line per phase transition.
pub fn format_progress(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Preparing { dest } => format!("Cleaning {}...", dest.display()),
        ProgressEvent::Building {
            role,
            variant,
            command,
        } => format!("Building {} app ({}): {}", variant, role, command),
        ProgressEvent::Merging { role, variant } => {
            format!("Merging {} build ({})...", variant, role)
        }
        ProgressEvent::Verifying { files } => format!("Verifying {}...", files.join(", ")),
    }
}

fn format_report_line(report: &MergeReport) -> String {
    let mut line = format!(
        "  {}: {} copied, {} overwritten, {} kept from baseline",
        report.variant,
        report.copied.len(),
        report.overwritten.len(),
        report.skipped.len()
    );
    if !report.replaced_dirs.is_empty() {
        line.push_str(&format!(
            ", {} nested directories replaced ({})",
            report.replaced_dirs.len(),
            report.replaced_dirs.join(", ")
        ));
    }
    if report.source_missing {
        line.push_str(", output tree was missing");
    }
    line
}

pub fn format_build_summary_text(summary: &BuildSummary) -> String {
    let mut lines = vec![format!(
        "{} Build complete! Both apps are ready in {}",
        "✓".green(),
        summary.dest.display()
    )];
    for file in &summary.entry_files {
        lines.push(format!("  - {}", file));
    }
    lines.push(String::new());
    lines.push("Merge:".to_string());
    lines.push(format_report_line(&summary.baseline));
    lines.push(format_report_line(&summary.overlay));
    lines.push(format!("  Digest: {}", summary.digest));
    lines.join("\n")
}

pub fn format_build_summary_json(summary: &BuildSummary) -> Result<String, DistError> {
    serde_json::to_string_pretty(summary).map_err(|e| DistError::ConfigError(e.to_string()))
}

pub fn format_alias_outcome(outcome: &AliasOutcome) -> String {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    format!(
        "{} Copied {} to {} ({} bytes)",
        "✓".green(),
        name(&outcome.source),
        name(&outcome.target),
        outcome.bytes
    )
}

pub fn format_verify_ok(dir: &Path, files: &[String]) -> String {
    format!(
        "{} Verified {} in {}",
        "✓".green(),
        files.join(", "),
        dir.display()
    )
}

pub fn format_listing_text(listing: &TreeListing) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Kind", "Size"]);
    for entry in &listing.entries {
        table.add_row(vec![
            entry.path.clone(),
            entry.kind.clone(),
            entry.size.map(|s| s.to_string()).unwrap_or_default(),
        ]);
    }

    format!(
        "{}\n{}\n{} files, {} directories, {} bytes\nDigest: {}",
        listing.root.display().bold(),
        table,
        listing.files,
        listing.directories,
        listing.total_bytes,
        listing.digest
    )
}

pub fn format_listing_json(listing: &TreeListing) -> Result<String, DistError> {
    serde_json::to_string_pretty(listing).map_err(|e| DistError::ConfigError(e.to_string()))
}
