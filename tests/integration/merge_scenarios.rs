//! End-to-end merge scenarios through the library API.

use super::test_utils::{read, write_tree};
use distmerge::config::DistConfig;
use distmerge::error::DistError;
use distmerge::merge::{merge_baseline, merge_overlay, prepare, verify};
use distmerge::pipeline::{Pipeline, Stage};
use distmerge::tree::walker::Walker;
use distmerge::variant::{BuildInvocation, BuildRunner, VariantRole};
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

/// Stands in for the bundler: writes canned files into the requested output dir.
struct CannedBuild {
    outputs: HashMap<&'static str, Vec<(&'static str, &'static str)>>,
}

impl CannedBuild {
    fn new(
        baseline: Vec<(&'static str, &'static str)>,
        overlay: Vec<(&'static str, &'static str)>,
    ) -> Self {
        let mut outputs = HashMap::new();
        outputs.insert("student", baseline);
        outputs.insert("admin", overlay);
        Self { outputs }
    }
}

impl BuildRunner for CannedBuild {
    fn run(&self, invocation: &BuildInvocation) -> Result<(), DistError> {
        let files = &self.outputs[invocation.variant_id.as_str()];
        write_tree(&invocation.working_dir.join(&invocation.out_dir), files);
        Ok(())
    }
}

fn file_keys(root: &Path) -> Vec<String> {
    Walker::new(root)
        .walk()
        .unwrap()
        .into_iter()
        .filter(|e| !e.is_dir())
        .map(|e| distmerge::tree::path::relative_key(e.path()))
        .collect()
}

#[test]
fn test_disjoint_assets_are_unioned() {
    let temp = TempDir::new().unwrap();
    let config = DistConfig::default();
    let build = CannedBuild::new(
        vec![
            ("student.html", "s"),
            ("assets/app.js", "app"),
            ("assets/logo.png", "png"),
        ],
        vec![("admin.html", "a"), ("assets/admin.js", "adm")],
    );

    Pipeline::new(temp.path(), &config, &build).run().unwrap();

    let dist = temp.path().join("dist");
    assert_eq!(
        file_keys(&dist),
        vec![
            "admin.html",
            "assets/admin.js",
            "assets/app.js",
            "assets/logo.png",
            "student.html"
        ]
    );
}

#[test]
fn test_shared_asset_takes_overlay_bytes() {
    let temp = TempDir::new().unwrap();
    let config = DistConfig::default();
    let build = CannedBuild::new(
        vec![("student.html", "s"), ("assets/shared.css", "body{}")],
        vec![("admin.html", "a"), ("assets/shared.css", "main{}")],
    );

    let summary = Pipeline::new(temp.path(), &config, &build).run().unwrap();

    assert_eq!(read(&temp.path().join("dist"), "assets/shared.css"), "main{}");
    assert_eq!(summary.overlay.overwritten, vec!["assets/shared.css"]);
}

#[test]
fn test_top_level_file_collision_keeps_baseline_bytes() {
    let temp = TempDir::new().unwrap();
    let config = DistConfig::default();
    let build = CannedBuild::new(
        vec![("student.html", "s"), ("robots.txt", "baseline")],
        vec![("admin.html", "a"), ("robots.txt", "overlay")],
    );

    Pipeline::new(temp.path(), &config, &build).run().unwrap();

    assert_eq!(read(&temp.path().join("dist"), "robots.txt"), "baseline");
}

#[test]
fn test_overlay_entry_file_replaces_baseline_copy() {
    let temp = TempDir::new().unwrap();
    let config = DistConfig::default();
    let build = CannedBuild::new(
        vec![("student.html", "s"), ("admin.html", "placeholder")],
        vec![("admin.html", "real admin")],
    );

    Pipeline::new(temp.path(), &config, &build).run().unwrap();

    assert_eq!(read(&temp.path().join("dist"), "admin.html"), "real admin");
}

#[test]
fn test_missing_overlay_entry_fails_run() {
    let temp = TempDir::new().unwrap();
    let config = DistConfig::default();
    let build = CannedBuild::new(vec![("student.html", "s")], vec![("assets/admin.js", "adm")]);

    let mut pipeline = Pipeline::new(temp.path(), &config, &build);
    pipeline.prepare().unwrap();
    pipeline.build(VariantRole::Baseline).unwrap();
    pipeline.merge(VariantRole::Baseline).unwrap();
    pipeline.build(VariantRole::Overlay).unwrap();
    pipeline.merge(VariantRole::Overlay).unwrap();
    let err = pipeline.verify().unwrap_err();

    assert!(err.to_string().contains("admin.html"));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(pipeline.stage(), Stage::Failed);
}

#[test]
fn test_rerun_starts_from_clean_tree() {
    let temp = TempDir::new().unwrap();
    let config = DistConfig::default();
    write_tree(&temp.path().join("dist"), &[("stale.js", "old")]);
    let build = CannedBuild::new(vec![("student.html", "s")], vec![("admin.html", "a")]);

    Pipeline::new(temp.path(), &config, &build).run().unwrap();
    let first = file_keys(&temp.path().join("dist"));
    Pipeline::new(temp.path(), &config, &build).run().unwrap();
    let second = file_keys(&temp.path().join("dist"));

    assert_eq!(first, vec!["admin.html", "student.html"]);
    assert_eq!(first, second);
}

#[test]
fn test_merge_steps_without_pipeline() {
    let temp = TempDir::new().unwrap();
    let a = temp.path().join("a");
    let b = temp.path().join("b");
    let dest = temp.path().join("out");
    write_tree(&a, &[("student.html", "s"), ("assets/app.js", "app")]);
    write_tree(&b, &[("admin.html", "a"), ("docs/guide/index.md", "# guide")]);

    prepare(&dest).unwrap();
    merge_baseline(&a, &dest, "student").unwrap();
    let report = merge_overlay(&b, &dest, "admin", "admin.html").unwrap();
    verify(&dest, &["student.html", "admin.html"]).unwrap();

    assert_eq!(report.copied, vec!["admin.html", "docs/guide/index.md"]);
    assert!(!a.exists());
    assert!(!b.exists());
}
