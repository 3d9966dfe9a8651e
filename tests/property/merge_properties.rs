//! Merge precedence properties over generated output trees.

use distmerge::merge::{merge_baseline, merge_overlay, prepare};
use distmerge::tree::hasher;
use proptest::prelude::*;
use proptest::test_runner::{Config, TestRunner};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const OVERLAY_ENTRY: &str = "admin.html";

struct Trees {
    _temp: TempDir,
    baseline: PathBuf,
    overlay: PathBuf,
    dest: PathBuf,
}

fn trees() -> Trees {
    let temp = TempDir::new().unwrap();
    let baseline = temp.path().join("a");
    let overlay = temp.path().join("b");
    let dest = temp.path().join("dist");
    fs::create_dir_all(&baseline).unwrap();
    fs::create_dir_all(&overlay).unwrap();
    prepare(&dest).unwrap();
    Trees {
        _temp: temp,
        baseline,
        overlay,
        dest,
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn merge(t: &Trees) {
    merge_baseline(&t.baseline, &t.dest, "student").unwrap();
    merge_overlay(&t.overlay, &t.dest, "admin", OVERLAY_ENTRY).unwrap();
}

fn top_level(root: &Path) -> BTreeSet<String> {
    fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn name() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn content() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,16}"
}

fn runner() -> TestRunner {
    TestRunner::new(Config::with_cases(32))
}

/// Disjoint top-level names end up as the union.
#[test]
fn test_disjoint_top_level_union_property() {
    runner()
        .run(
            &prop::collection::btree_map(
                name(),
                (any::<bool>(), any::<bool>(), content()),
                1..8,
            ),
            |entries| {
                let t = trees();
                for (name, (in_baseline, as_dir, body)) in &entries {
                    let root = if *in_baseline { &t.baseline } else { &t.overlay };
                    let rel = if *as_dir {
                        format!("{}/inner", name)
                    } else {
                        name.clone()
                    };
                    write(root, &rel, body);
                }

                merge(&t);

                let expected: BTreeSet<String> = entries.keys().cloned().collect();
                prop_assert_eq!(top_level(&t.dest), expected);
                Ok(())
            },
        )
        .unwrap();
}

/// A file at the same top-level path keeps the baseline's bytes.
#[test]
fn test_baseline_wins_top_level_files_property() {
    runner()
        .run(
            &prop::collection::btree_map(name(), (content(), content()), 1..6),
            |files| {
                let t = trees();
                for (name, (a, b)) in &files {
                    write(&t.baseline, name, a);
                    write(&t.overlay, name, b);
                }

                merge(&t);

                for (name, (a, _)) in &files {
                    prop_assert_eq!(&fs::read_to_string(t.dest.join(name)).unwrap(), a);
                }
                Ok(())
            },
        )
        .unwrap();
}

/// The overlay's entry file always lands with the overlay's bytes.
#[test]
fn test_overlay_entry_always_lands_property() {
    runner()
        .run(
            &(prop::option::of(content()), content()),
            |(baseline_copy, overlay_copy)| {
                let t = trees();
                if let Some(body) = &baseline_copy {
                    write(&t.baseline, OVERLAY_ENTRY, body);
                }
                write(&t.overlay, OVERLAY_ENTRY, &overlay_copy);

                merge(&t);

                prop_assert_eq!(
                    fs::read_to_string(t.dest.join(OVERLAY_ENTRY)).unwrap(),
                    overlay_copy
                );
                Ok(())
            },
        )
        .unwrap();
}

/// Children of a shared directory are unioned; collisions take the overlay's bytes.
#[test]
fn test_shared_directory_one_level_property() {
    runner()
        .run(
            &prop::collection::btree_map(name(), (0u8..3, content(), content()), 1..8),
            |children| {
                let t = trees();
                // 0: baseline only, 1: overlay only, 2: both
                for (child, (side, a, b)) in &children {
                    let rel = format!("assets/{}", child);
                    if *side != 1 {
                        write(&t.baseline, &rel, a);
                    }
                    if *side != 0 {
                        write(&t.overlay, &rel, b);
                    }
                }

                merge(&t);

                let expected: BTreeSet<String> = children.keys().cloned().collect();
                prop_assert_eq!(top_level(&t.dest.join("assets")), expected);
                for (child, (side, a, b)) in &children {
                    let got = fs::read_to_string(t.dest.join("assets").join(child)).unwrap();
                    let want = if *side == 0 { a } else { b };
                    prop_assert_eq!(&got, want);
                }
                Ok(())
            },
        )
        .unwrap();
}

/// Identical trees digest identically regardless of write order.
#[test]
fn test_tree_digest_determinism_property() {
    let mut runner = TestRunner::default();

    // File names carry an extension and directory names never do, so keys cannot collide
    runner
        .run(
            &prop::collection::btree_map("(d[0-9]/)?[a-z]{1,4}\\.txt", content(), 1..10),
            |files: BTreeMap<String, String>| {
                let first = TempDir::new().unwrap();
                let second = TempDir::new().unwrap();
                for (rel, body) in &files {
                    write(first.path(), rel, body);
                }
                for (rel, body) in files.iter().rev() {
                    write(second.path(), rel, body);
                }

                let a = hasher::compute_tree_digest(first.path()).unwrap();
                let b = hasher::compute_tree_digest(second.path()).unwrap();
                prop_assert_eq!(a, b);
                Ok(())
            },
        )
        .unwrap();
}

/// Preparing twice leaves the same empty directory.
#[test]
fn test_prepare_idempotence_property() {
    let mut runner = TestRunner::new(Config::with_cases(16));

    runner
        .run(
            &prop::collection::vec(("[a-z]{1,4}/[a-z]{1,4}", content()), 0..6),
            |files| {
                let temp = TempDir::new().unwrap();
                let dest = temp.path().join("dist");
                for (rel, body) in &files {
                    write(&dest, rel, body);
                }

                prepare(&dest).unwrap();
                let first = top_level(&dest);
                prepare(&dest).unwrap();
                let second = top_level(&dest);

                prop_assert!(first.is_empty());
                prop_assert_eq!(first, second);
                Ok(())
            },
        )
        .unwrap();
}
