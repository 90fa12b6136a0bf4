//! Shared helpers for CLI tests

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Temporary workspace with its own config file location.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config").join("config.toml")
    }

    /// Write `content` to `name` inside the workspace and return its path.
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Write the config file directly.
    pub fn write_config(&self, content: &str) {
        let path = self.config_path();
        fs::create_dir_all(path.parent().expect("config has a parent"))
            .expect("Failed to create config dir");
        fs::write(path, content).expect("Failed to write config");
    }

    /// `smartwrite` pointed at this workspace's config, with logging quiet.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("smartwrite").expect("binary builds");
        cmd.env("SMARTWRITE_CONFIG", self.config_path())
            .env_remove("SMARTWRITE_LOG")
            .current_dir(self.dir.path());
        cmd
    }
}
