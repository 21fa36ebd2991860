//! Post-update actions: git staging and source downloads
//!
//! This module provides:
//! - Detection-free subprocess helpers for `git` and `spectool`
//! - An ActionRunner trait so tests can substitute a mock

use std::path::Path;
use std::process::{Command, Output};

/// Result of one post-update action
#[derive(Debug, Clone)]
pub struct ActionResult {
    /// The command that was executed
    pub command: String,
    /// Whether the command succeeded
    pub success: bool,
    /// Standard output from the command
    pub stdout: String,
    /// Standard error from the command
    pub stderr: String,
}

impl ActionResult {
    /// Create a successful action result
    pub fn success(command: String, stdout: String, stderr: String) -> Self {
        Self {
            command,
            success: true,
            stdout,
            stderr,
        }
    }

    /// Create a failed action result
    pub fn failure(command: String, stdout: String, stderr: String) -> Self {
        Self {
            command,
            success: false,
            stdout,
            stderr,
        }
    }
}

/// Trait for running post-update actions
pub trait ActionRunner: Send + Sync {
    /// Stage the spec file and commit it with an autoupdate message
    fn stage_and_commit(&self, spec_path: &Path, version: &str) -> ActionResult;

    /// Download the spec's sources with spectool
    fn download_sources(&self, spec_path: &Path) -> ActionResult;
}

/// Default runner that executes real commands
#[derive(Debug, Default)]
pub struct SystemActions;

impl SystemActions {
    /// Create a new system action runner
    pub fn new() -> Self {
        Self
    }

    /// Run a command in a working directory and capture output
    fn run_command(&self, command: &[&str], working_dir: &Path) -> std::io::Result<Output> {
        if command.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Empty command",
            ));
        }

        Command::new(command[0])
            .args(&command[1..])
            .current_dir(working_dir)
            .output()
    }

    fn run_and_collect(&self, command: &[&str], working_dir: &Path) -> ActionResult {
        let command_str = command.join(" ");
        match self.run_command(command, working_dir) {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                if output.status.success() {
                    ActionResult::success(command_str, stdout, stderr)
                } else {
                    ActionResult::failure(command_str, stdout, stderr)
                }
            }
            Err(e) => ActionResult::failure(
                command_str,
                String::new(),
                format!("Failed to execute command: {}", e),
            ),
        }
    }
}

impl ActionRunner for SystemActions {
    fn stage_and_commit(&self, spec_path: &Path, version: &str) -> ActionResult {
        let working_dir = spec_path.parent().unwrap_or_else(|| Path::new("."));
        let spec_name = spec_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let add = self.run_and_collect(&["git", "add", &spec_name], working_dir);
        if !add.success {
            return add;
        }

        let message = format!("autoupdate version to {}", version);
        self.run_and_collect(&["git", "commit", "-m", &message], working_dir)
    }

    fn download_sources(&self, spec_path: &Path) -> ActionResult {
        let working_dir = spec_path.parent().unwrap_or_else(|| Path::new("."));
        let spec_name = spec_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        self.run_and_collect(&["spectool", "-g", &spec_name], working_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_action_result_constructors() {
        let ok = ActionResult::success("git add x".into(), "out".into(), String::new());
        assert!(ok.success);
        assert_eq!(ok.command, "git add x");

        let bad = ActionResult::failure("spectool -g x".into(), String::new(), "boom".into());
        assert!(!bad.success);
        assert_eq!(bad.stderr, "boom");
    }

    #[test]
    fn test_run_command_empty() {
        let actions = SystemActions::new();
        let dir = TempDir::new().unwrap();
        assert!(actions.run_command(&[], dir.path()).is_err());
    }

    #[test]
    fn test_missing_binary_is_failure() {
        let actions = SystemActions::new();
        let dir = TempDir::new().unwrap();
        let result = actions.run_and_collect(&["specup-no-such-binary"], dir.path());
        assert!(!result.success);
        assert!(result.stderr.contains("Failed to execute command"));
    }

    #[test]
    fn test_stage_and_commit_outside_repo_fails() {
        let actions = SystemActions::new();
        let dir = TempDir::new().unwrap();
        let spec = dir.path().join("zlib.spec");
        fs::write(&spec, "Version: 1.3.1\n").unwrap();

        // No git repository here, so either git is missing or `git add` fails
        let result = actions.stage_and_commit(&spec, "1.3.1");
        assert!(!result.success);
    }
}
