//! TestWorld pattern for CLI integration tests.
//!
//! Every world owns a temp directory holding the snapshot and an (initially
//! absent) config file, so no test ever reads the user's real config.

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::{SnapshotBuilder, fixtures};

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use mastrace_testing::TestWorld;
///
/// let world = TestWorld::new().with_sample_snapshot();
/// let result = world.run(&["session", "list"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    snapshot_path: PathBuf,
    config_path: PathBuf,
    format: String,
    pass_snapshot: bool,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment with no snapshot written yet.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let snapshot_path = temp_dir.path().join("runtime.db");
        let config_path = temp_dir.path().join("config.toml");

        Self {
            temp_dir,
            snapshot_path,
            config_path,
            format: "plain".to_string(),
            pass_snapshot: true,
            env_vars: HashMap::new(),
        }
    }

    /// Write the two-session fixture snapshot.
    pub fn with_sample_snapshot(self) -> Self {
        fixtures::two_session_snapshot(&self.snapshot_path)
            .expect("Failed to write sample snapshot");
        self
    }

    /// Write a custom snapshot through a builder callback.
    pub fn with_snapshot<F>(self, build: F) -> Self
    where
        F: FnOnce(&mut SnapshotBuilder) -> Result<()>,
    {
        let mut builder =
            SnapshotBuilder::create(&self.snapshot_path).expect("Failed to create snapshot");
        build(&mut builder).expect("Failed to populate snapshot");
        self
    }

    /// Write a config file for the CLI to pick up.
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(&self.config_path, toml).expect("Failed to write config");
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    /// Leave `--snapshot` off the command line so the CLI falls back to config.
    pub fn without_snapshot_flag(mut self) -> Self {
        self.pass_snapshot = false;
        self
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Configure a CLI command with this test environment's settings.
    ///
    /// The caller provides the base command (e.g. from `cargo_bin_cmd!("mastrace")`).
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        if self.pass_snapshot {
            cmd.arg("--snapshot").arg(&self.snapshot_path);
        }
        cmd.arg("--config")
            .arg(&self.config_path)
            .arg("--format")
            .arg(&self.format);

        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("RUST_LOG");
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run the `mastrace` binary with `args` in this environment.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("mastrace")
            .map_err(|e| anyhow::anyhow!("Failed to find mastrace binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
