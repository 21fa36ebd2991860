//! Upstream version lookup via the external checker
//!
//! This module provides:
//! - VersionChecker trait so tests can substitute fakes
//! - NvcheckerRunner: writes a single-entry config to a temp file, runs
//!   `nvchecker --logger json` and extracts the reported version from its
//!   JSON event lines

use crate::config::SourceDescriptor;
use crate::error::CheckError;
use async_trait::async_trait;
use serde_json::Value;
use std::io::Write;
use tokio::process::Command;

/// Default checker command
pub const DEFAULT_CHECKER: &str = "nvchecker";

/// Trait for upstream version lookup
#[async_trait]
pub trait VersionChecker: Send + Sync {
    /// Report the raw upstream version for a package
    ///
    /// The returned string is whatever the checker extracted (it may still
    /// carry a tag prefix); normalization is the caller's job.
    async fn check(
        &self,
        package: &str,
        descriptor: &SourceDescriptor,
    ) -> Result<String, CheckError>;
}

/// Checker implementation that shells out to nvchecker
pub struct NvcheckerRunner {
    command: String,
}

impl NvcheckerRunner {
    /// Create a runner using the default `nvchecker` command
    pub fn new() -> Self {
        Self::with_command(DEFAULT_CHECKER)
    }

    /// Create a runner with a custom checker command
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Render the single-entry config handed to the checker
    fn render_config(
        &self,
        package: &str,
        descriptor: &SourceDescriptor,
    ) -> Result<String, CheckError> {
        let mut root = toml::Table::new();
        let entry = toml::Value::try_from(descriptor.checker_entry()).map_err(|e| {
            CheckError::checker_failed(package, format!("could not serialize descriptor: {}", e))
        })?;
        root.insert(package.to_string(), entry);
        toml::to_string(&root).map_err(|e| {
            CheckError::checker_failed(package, format!("could not render config: {}", e))
        })
    }
}

impl Default for NvcheckerRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VersionChecker for NvcheckerRunner {
    async fn check(
        &self,
        package: &str,
        descriptor: &SourceDescriptor,
    ) -> Result<String, CheckError> {
        let config = self.render_config(package, descriptor)?;

        let mut tmp = tempfile::Builder::new()
            .prefix("specup-")
            .suffix(".toml")
            .tempfile()
            .map_err(|e| {
                CheckError::checker_failed(package, format!("could not create temp config: {}", e))
            })?;
        tmp.write_all(config.as_bytes()).and_then(|_| tmp.flush()).map_err(|e| {
            CheckError::checker_failed(package, format!("could not write temp config: {}", e))
        })?;

        let output = Command::new(&self.command)
            .arg("-c")
            .arg(tmp.path())
            .arg("--logger")
            .arg("json")
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CheckError::CheckerUnavailable {
                        command: self.command.clone(),
                        message: e.to_string(),
                    }
                } else {
                    CheckError::checker_failed(package, e.to_string())
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some(version) = parse_checker_output(package, &stdout) {
            return Ok(version);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().last().unwrap_or("no diagnostic output");
            return Err(CheckError::checker_failed(
                package,
                format!("exit status {}: {}", output.status, detail),
            ));
        }

        Err(CheckError::no_version_found(package))
    }
}

/// Extract the version for `package` from the checker's JSON event lines
///
/// nvchecker's json logger emits one object per line; the event carrying a
/// `version` string for our package is the answer. Non-JSON lines and
/// events for other packages are ignored.
pub fn parse_checker_output(package: &str, stdout: &str) -> Option<String> {
    for line in stdout.lines() {
        let Ok(event) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        if event.get("name").and_then(Value::as_str) != Some(package) {
            continue;
        }
        if let Some(version) = event.get("version").and_then(Value::as_str) {
            return Some(version.to_string());
        }
    }
    None
}
