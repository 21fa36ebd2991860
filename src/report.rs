//! Append-only result log
//!
//! One line per applied update: `<timestamp> <package>: <old> -> <new>`.
//! Logging is best-effort; a write failure never fails the package.

use chrono::{SecondsFormat, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only update log
#[derive(Debug, Clone, Default)]
pub struct UpdateLog {
    path: Option<PathBuf>,
}

impl UpdateLog {
    /// Create an update log; None disables logging
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Create a disabled update log
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Returns true if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Append a result line for an applied update
    pub fn record(&self, package: &str, from: &str, to: &str) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        append_line(path, &format_line(package, from, to))
    }
}

/// Render one log line, timestamp first
fn format_line(package: &str, from: &str, to: &str) -> String {
    format!(
        "{} {}: {} -> {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        package,
        from,
        to
    )
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}
