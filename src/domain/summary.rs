//! Whole-run summary types

use super::{PackageOutcome, PackageRecord};
use serde::{Deserialize, Serialize};

/// Summary of one orchestration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Per-package records, in processing order
    pub records: Vec<PackageRecord>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new RunSummary
    pub fn new(dry_run: bool) -> Self {
        Self {
            records: Vec::new(),
            dry_run,
        }
    }

    /// Adds a package record
    pub fn add_record(&mut self, record: PackageRecord) {
        self.records.push(record);
    }

    /// Number of packages processed
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// Number of packages updated (or that would be, in dry-run)
    pub fn updated_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_updated())
            .count()
    }

    /// Number of packages already current
    pub fn current_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, PackageOutcome::Current { .. }))
            .count()
    }

    /// Number of packages that failed
    pub fn failed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome.is_failed())
            .count()
    }

    /// Returns true if any package failed
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// Returns true if any package was (or would be) updated
    pub fn has_updates(&self) -> bool {
        self.updated_count() > 0
    }

    /// All updated records
    pub fn updates(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records.iter().filter(|r| r.outcome.is_updated())
    }

    /// All failed records
    pub fn failures(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records.iter().filter(|r| r.outcome.is_failed())
    }
}
