//! Layered configuration loading against isolated XDG directories.

use super::test_utils::with_xdg_env;
use distmerge::config::{ConfigLoader, WORKSPACE_CONFIG_FILE};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_global_config_applies_without_workspace_file() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();

    let config = with_xdg_env(&temp, |config_home| {
        let dir = config_home.join("distmerge");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "dest_dir = \"public\"\n").unwrap();
        ConfigLoader::load(&workspace).unwrap()
    });

    assert_eq!(config.dest_dir, PathBuf::from("public"));
    assert_eq!(config.build.program, "npm");
}

#[test]
fn test_explicit_file_skips_workspace_file() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(
        workspace.join(WORKSPACE_CONFIG_FILE),
        "dest_dir = \"from-workspace\"\n",
    )
    .unwrap();
    let explicit = temp.path().join("ci.toml");
    fs::write(&explicit, "[build]\nprogram = \"pnpm\"\n").unwrap();

    let config = with_xdg_env(&temp, |_| ConfigLoader::load_from_file(&explicit).unwrap());

    assert_eq!(config.build.program, "pnpm");
    assert_eq!(config.dest_dir, PathBuf::from("dist"));
}

#[test]
fn test_overlapping_output_dirs_fail_to_load() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(
        workspace.join(WORKSPACE_CONFIG_FILE),
        "[variants.overlay]\nout_dir = \"dist\"\n",
    )
    .unwrap();

    let result = with_xdg_env(&temp, |_| ConfigLoader::load(&workspace));
    assert!(result.is_err());
}
