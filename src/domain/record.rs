//! Per-package run records and outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering of the upstream version relative to the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionOrder {
    /// Upstream is older than the recorded version
    Older,
    /// Upstream equals the recorded version
    Equal,
    /// Upstream is newer than the recorded version
    Newer,
}

impl fmt::Display for VersionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionOrder::Older => write!(f, "older"),
            VersionOrder::Equal => write!(f, "equal"),
            VersionOrder::Newer => write!(f, "newer"),
        }
    }
}

/// Outcome of processing a single package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PackageOutcome {
    /// Spec file rewritten (or would be, in dry-run)
    Updated { from: String, to: String },
    /// Spec already records the latest upstream version (or newer)
    Current { version: String },
    /// Processing failed; the reason is the error display string
    Failed { reason: String },
}

impl PackageOutcome {
    /// Creates an Updated outcome
    pub fn updated(from: impl Into<String>, to: impl Into<String>) -> Self {
        PackageOutcome::Updated {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Creates a Current outcome
    pub fn current(version: impl Into<String>) -> Self {
        PackageOutcome::Current {
            version: version.into(),
        }
    }

    /// Creates a Failed outcome
    pub fn failed(reason: impl Into<String>) -> Self {
        PackageOutcome::Failed {
            reason: reason.into(),
        }
    }

    /// Returns true if this is an update
    pub fn is_updated(&self) -> bool {
        matches!(self, PackageOutcome::Updated { .. })
    }

    /// Returns true if this is a failure
    pub fn is_failed(&self) -> bool {
        matches!(self, PackageOutcome::Failed { .. })
    }
}

/// Record of one package's run: name, versions seen, and the outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Package name
    pub name: String,
    /// Version recorded in the spec file, when it could be parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    /// Normalized upstream version, when the checker reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
    /// What happened
    #[serde(flatten)]
    pub outcome: PackageOutcome,
}

impl PackageRecord {
    /// Creates a record for a successful update
    pub fn updated(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        Self {
            name: name.into(),
            current: Some(from.clone()),
            upstream: Some(to.clone()),
            outcome: PackageOutcome::Updated { from, to },
        }
    }

    /// Creates a record for an already-current package
    pub fn current(
        name: impl Into<String>,
        version: impl Into<String>,
        upstream: Option<String>,
    ) -> Self {
        let version = version.into();
        Self {
            name: name.into(),
            current: Some(version.clone()),
            upstream,
            outcome: PackageOutcome::Current { version },
        }
    }

    /// Creates a record for a failed package
    pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current: None,
            upstream: None,
            outcome: PackageOutcome::failed(reason),
        }
    }

}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            PackageOutcome::Updated { from, to } => {
                write!(f, "{}: {} -> {}", self.name, from, to)
            }
            PackageOutcome::Current { version } => {
                write!(f, "{}: already current ({})", self.name, version)
            }
            PackageOutcome::Failed { reason } => write!(f, "{}: error: {}", self.name, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_order_display() {
        assert_eq!(VersionOrder::Older.to_string(), "older");
        assert_eq!(VersionOrder::Equal.to_string(), "equal");
        assert_eq!(VersionOrder::Newer.to_string(), "newer");
    }

    #[test]
    fn test_outcome_updated() {
        let outcome = PackageOutcome::updated("1.2.13", "1.3.1");
        assert!(outcome.is_updated());
        assert!(!outcome.is_failed());
    }

    #[test]
    fn test_outcome_failed() {
        let outcome = PackageOutcome::failed("checker unavailable");
        assert!(outcome.is_failed());
    }

    #[test]
    fn test_record_updated() {
        let record = PackageRecord::updated("zlib", "1.2.13", "1.3.1");
        assert_eq!(record.name, "zlib");
        assert_eq!(record.current.as_deref(), Some("1.2.13"));
        assert_eq!(record.upstream.as_deref(), Some("1.3.1"));
        assert!(record.outcome.is_updated());
    }

    #[test]
    fn test_record_current() {
        let record = PackageRecord::current("zlib", "1.3.1", Some("1.3.1".to_string()));
        assert_eq!(record.current.as_deref(), Some("1.3.1"));
        assert!(!record.outcome.is_updated());
        assert!(!record.outcome.is_failed());
    }

    #[test]
    fn test_record_failed() {
        let record = PackageRecord::failed("zlib", "no upstream version");
        assert!(record.current.is_none());
        assert!(record.outcome.is_failed());
    }

    #[test]
    fn test_record_display() {
        let record = PackageRecord::updated("zlib", "1.2.13", "1.3.1");
        assert_eq!(record.to_string(), "zlib: 1.2.13 -> 1.3.1");

        let record = PackageRecord::current("zlib", "1.3.1", None);
        assert_eq!(record.to_string(), "zlib: already current (1.3.1)");
    }

    #[test]
    fn test_record_serializes_status_tag() {
        let record = PackageRecord::updated("zlib", "1.2.13", "1.3.1");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"status\":\"updated\""));
        assert!(json.contains("\"from\":\"1.2.13\""));
        assert!(json.contains("\"to\":\"1.3.1\""));
    }
}
