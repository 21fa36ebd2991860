//! Text output formatter for human-readable display
//!
//! One line per package (updated / already current / error with reason)
//! and a closing summary line, with colors and a dry-run prefix.

use crate::domain::PackageOutcome;
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self { verbosity, dry_run }
    }

    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            format!("{} ", "(dry-run)".cyan())
        } else {
            String::new()
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = &result.summary;

        if summary.records.is_empty() {
            if self.verbosity != Verbosity::Quiet {
                writeln!(writer, "No packages to process")?;
            }
            return Ok(());
        }

        for record in &summary.records {
            match &record.outcome {
                PackageOutcome::Updated { from, to } => {
                    writeln!(
                        writer,
                        "{}{} {}: {} -> {}",
                        self.dry_run_prefix(),
                        "updated".green().bold(),
                        record.name,
                        from.dimmed(),
                        to.green()
                    )?;
                }
                PackageOutcome::Current { version } => {
                    if self.verbosity == Verbosity::Quiet {
                        continue;
                    }
                    writeln!(
                        writer,
                        "{} {}: {}",
                        "current".dimmed(),
                        record.name,
                        version.dimmed()
                    )?;
                }
                PackageOutcome::Failed { reason } => {
                    writeln!(
                        writer,
                        "{} {}: {}",
                        "error".red().bold(),
                        record.name,
                        reason
                    )?;
                }
            }
        }

        if self.verbosity != Verbosity::Quiet {
            writeln!(writer)?;
            writeln!(
                writer,
                "{}{} updated, {} current, {} failed ({} packages)",
                self.dry_run_prefix(),
                summary.updated_count(),
                summary.current_count(),
                summary.failed_count(),
                summary.total()
            )?;
        }

        if self.verbosity == Verbosity::Verbose && !result.errors.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Errors:")?;
            for error in &result.errors {
                writeln!(writer, "  - {}", error)?;
            }
        }

        Ok(())
    }
}
