//! JSON output formatter for machine processing

use crate::domain::PackageRecord;
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-package records
    packages: &'a [PackageRecord],
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    /// Number of packages updated
    updated: usize,
    /// Number of packages already current
    current: usize,
    /// Number of packages that failed
    failed: usize,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = &result.summary;
        let output = JsonOutput {
            dry_run: summary.dry_run,
            summary: JsonSummary {
                updated: summary.updated_count(),
                current: summary.current_count(),
                failed: summary.failed_count(),
            },
            packages: &summary.records,
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        if self.verbosity == Verbosity::Quiet {
            serde_json::to_writer(&mut *writer, &output)?;
        } else {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PackageRecord, RunSummary};

    fn render(verbosity: Verbosity, result: &OrchestratorResult) -> String {
        let mut buf = Vec::new();
        JsonFormatter::new(verbosity).format(result, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample_result() -> OrchestratorResult {
        let mut summary = RunSummary::new(false);
        summary.add_record(PackageRecord::updated("zlib", "1.2.13", "1.3.1"));
        summary.add_record(PackageRecord::failed("libedit", "checker unavailable"));
        OrchestratorResult {
            summary,
            errors: Vec::new(),
        }
    }

    #[test]
    fn test_json_output_schema() {
        let output = render(Verbosity::Normal, &sample_result());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["dry_run"], false);
        assert_eq!(value["summary"]["updated"], 1);
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["packages"][0]["name"], "zlib");
        assert_eq!(value["packages"][0]["status"], "updated");
        assert_eq!(value["packages"][0]["from"], "1.2.13");
        assert_eq!(value["packages"][0]["to"], "1.3.1");
        assert_eq!(value["packages"][1]["status"], "failed");
    }

    #[test]
    fn test_json_quiet_is_compact() {
        let output = render(Verbosity::Quiet, &sample_result());
        // Compact output is a single line
        assert_eq!(output.trim_end().lines().count(), 1);
        assert!(serde_json::from_str::<serde_json::Value>(&output).is_ok());
    }

    #[test]
    fn test_json_errors_included() {
        let mut result = sample_result();
        result.errors.push(
            crate::orchestrator::OrchestratorError::CheckFailed {
                package: "libedit".to_string(),
                message: "checker unavailable".to_string(),
            },
        );
        let output = render(Verbosity::Normal, &result);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value["errors"][0]
            .as_str()
            .unwrap()
            .contains("libedit: check failed"));
    }
}
