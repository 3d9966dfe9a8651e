//! Shared test utilities for integration tests
//!
//! Tree fixtures, XDG isolation for in-process config loading, and a sandboxed
//! command builder for tests that spawn the CLI binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes XDG environment variable access across tests in this binary
static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
        }
    }

    fn restore(self) {
        match self.home {
            Some(orig) => std::env::set_var("HOME", orig),
            None => std::env::remove_var("HOME"),
        }
        match self.xdg_config_home {
            Some(orig) => std::env::set_var("XDG_CONFIG_HOME", orig),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir`.
///
/// Returns the config home so the test can place a global config file in it.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let config_home = test_dir.path().join("config");
    let home = test_dir.path().join("home");
    fs::create_dir_all(&config_home).unwrap();
    fs::create_dir_all(&home).unwrap();

    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);

    let result = f(&config_home);

    env_state.restore();
    result
}

/// Write `files` (relative path, content) under `root`, creating parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

/// Temp workspace plus isolated home and config dirs for spawning the binary.
pub struct Sandbox {
    pub temp: TempDir,
    pub workspace: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join("ws");
        fs::create_dir_all(&workspace).unwrap();
        fs::create_dir_all(temp.path().join("home")).unwrap();
        fs::create_dir_all(temp.path().join("config")).unwrap();
        Self { temp, workspace }
    }

    /// Write the workspace's distmerge.toml.
    pub fn write_config(&self, contents: &str) {
        fs::write(self.workspace.join("distmerge.toml"), contents).unwrap();
    }

    /// The CLI binary with a clean environment and `--workspace` set.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_distmerge"));
        cmd.env("HOME", self.temp.path().join("home"))
            .env("XDG_CONFIG_HOME", self.temp.path().join("config"))
            .env_remove("DISTMERGE_ENV")
            .env_remove("DISTMERGE_LOG")
            .env_remove("DISTMERGE__DEST_DIR")
            .arg("--quiet")
            .arg("--workspace")
            .arg(&self.workspace);
        cmd
    }
}
