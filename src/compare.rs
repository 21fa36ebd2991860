//! RPM version ordering via the external comparator
//!
//! This module provides:
//! - VersionComparator trait so tests can substitute fakes
//! - RpmVercmp: shells out to `rpmdev-vercmp` and maps its exit status to
//!   a three-way ordering

use crate::domain::VersionOrder;
use crate::error::CompareError;
use async_trait::async_trait;
use tokio::process::Command;

/// Default comparator command
pub const DEFAULT_COMPARATOR: &str = "rpmdev-vercmp";

/// Trait for three-way RPM version comparison
#[async_trait]
pub trait VersionComparator: Send + Sync {
    /// Compare the upstream version against the current one
    ///
    /// The result describes `upstream` relative to `current`: `Newer`
    /// means an update is due.
    async fn compare(&self, current: &str, upstream: &str) -> Result<VersionOrder, CompareError>;
}

/// Comparator implementation that shells out to rpmdev-vercmp
pub struct RpmVercmp {
    command: String,
}

impl RpmVercmp {
    /// Create a comparator using the default `rpmdev-vercmp` command
    pub fn new() -> Self {
        Self::with_command(DEFAULT_COMPARATOR)
    }

    /// Create a comparator with a custom command
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for RpmVercmp {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an rpmdev-vercmp exit code to an ordering of the second argument
/// relative to the first
///
/// rpmdev-vercmp convention: 0 = equal, 11 = first argument newer,
/// 12 = second argument newer. Anything else is a real failure.
pub fn exit_code_to_order(code: i32) -> Option<VersionOrder> {
    match code {
        0 => Some(VersionOrder::Equal),
        11 => Some(VersionOrder::Older),
        12 => Some(VersionOrder::Newer),
        _ => None,
    }
}

#[async_trait]
impl VersionComparator for RpmVercmp {
    async fn compare(&self, current: &str, upstream: &str) -> Result<VersionOrder, CompareError> {
        let output = Command::new(&self.command)
            .arg(current)
            .arg(upstream)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CompareError::ComparatorUnavailable {
                        command: self.command.clone(),
                        message: e.to_string(),
                    }
                } else {
                    CompareError::ComparatorError {
                        current: current.to_string(),
                        upstream: upstream.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let order = output.status.code().and_then(exit_code_to_order);
        order.ok_or_else(|| {
            let stderr = String::from_utf8_lossy(&output.stderr);
            CompareError::ComparatorError {
                current: current.to_string(),
                upstream: upstream.to_string(),
                message: match output.status.code() {
                    Some(code) => format!("exit status {}: {}", code, stderr.trim()),
                    None => "terminated by signal".to_string(),
                },
            }
        })
    }
}
