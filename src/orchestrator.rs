//! Update orchestrator coordinating the per-package workflow
//!
//! This module provides:
//! - Workflow coordination: resolve spec → parse → check → compare → apply
//! - Strictly sequential processing, one package at a time
//! - Per-package error capture with partial continuation
//! - Dry-run mode support
//!
//! The checker, comparator and post-update actions are held behind trait
//! objects so tests can substitute fakes without external binaries.

use crate::checker::{NvcheckerRunner, VersionChecker};
use crate::cli::CliArgs;
use crate::compare::{RpmVercmp, VersionComparator};
use crate::config::SourceTable;
use crate::domain::{PackageRecord, RunSummary, VersionOrder};
use crate::error::{AppError, ConfigError, SpecError};
use crate::progress::Progress;
use crate::remote::{ForgeClient, SpecFetcher};
use crate::report::UpdateLog;
use crate::specfile;
use crate::vcs::{ActionRunner, SystemActions};
use std::path::Path;

/// Orchestrator for the update workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Package → source descriptor table
    table: SourceTable,
    /// Upstream version lookup
    checker: Box<dyn VersionChecker>,
    /// RPM version ordering
    comparator: Box<dyn VersionComparator>,
    /// Post-update actions (git, spectool)
    actions: Box<dyn ActionRunner>,
    /// Spec file fetcher for --fetch, when enabled
    fetcher: Option<Box<dyn SpecFetcher>>,
    /// Append-only result log
    log: UpdateLog,
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Run summary with all per-package records
    pub summary: RunSummary,
    /// Errors encountered during processing
    pub errors: Vec<OrchestratorError>,
}

/// Errors that can occur during orchestration, tagged by package
#[derive(Debug)]
pub enum OrchestratorError {
    /// The package has no source table entry
    UnknownPackage { package: String },
    /// Upstream version lookup failed
    CheckFailed { package: String, message: String },
    /// Spec file could not be located or parsed
    SpecFailed { package: String, message: String },
    /// Version comparison failed
    CompareFailed { package: String, message: String },
    /// Spec file rewrite failed
    WriteFailed { package: String, message: String },
    /// A post-update action (git, spectool) failed
    ActionFailed { package: String, message: String },
}

impl OrchestratorError {
    fn from_app_error(package: &str, error: &AppError) -> Self {
        let package = package.to_string();
        let message = error.to_string();
        match error {
            AppError::Config(_) => OrchestratorError::UnknownPackage { package },
            AppError::Check(_) => OrchestratorError::CheckFailed { package, message },
            AppError::Spec(_) => OrchestratorError::SpecFailed { package, message },
            AppError::Compare(_) => OrchestratorError::CompareFailed { package, message },
            AppError::Write(_) => OrchestratorError::WriteFailed { package, message },
        }
    }
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::UnknownPackage { package } => {
                write!(f, "{}: not in the source table", package)
            }
            OrchestratorError::CheckFailed { package, message } => {
                write!(f, "{}: check failed: {}", package, message)
            }
            OrchestratorError::SpecFailed { package, message } => {
                write!(f, "{}: spec failed: {}", package, message)
            }
            OrchestratorError::CompareFailed { package, message } => {
                write!(f, "{}: compare failed: {}", package, message)
            }
            OrchestratorError::WriteFailed { package, message } => {
                write!(f, "{}: write failed: {}", package, message)
            }
            OrchestratorError::ActionFailed { package, message } => {
                write!(f, "{}: action failed: {}", package, message)
            }
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl Orchestrator {
    /// Create a new orchestrator from CLI arguments
    ///
    /// Loading the source table happens here; a missing or malformed table
    /// is fatal for the whole run.
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        let table = SourceTable::load(&args.config)?;
        let fetcher: Option<Box<dyn SpecFetcher>> = if args.fetch {
            Some(Box::new(ForgeClient::new(
                args.base_url.as_str(),
                args.branch.as_str(),
            )?))
        } else {
            None
        };
        let checker = Box::new(NvcheckerRunner::with_command(args.checker_cmd.as_str()));
        let comparator = Box::new(RpmVercmp::with_command(args.comparator_cmd.as_str()));
        let log = if args.dry_run {
            UpdateLog::disabled()
        } else {
            UpdateLog::new(args.log.clone())
        };

        Ok(Self {
            args,
            table,
            checker,
            comparator,
            actions: Box::new(SystemActions::new()),
            fetcher,
            log,
        })
    }

    /// Create an orchestrator with injected components (for testing)
    pub fn with_components(
        args: CliArgs,
        table: SourceTable,
        checker: Box<dyn VersionChecker>,
        comparator: Box<dyn VersionComparator>,
        actions: Box<dyn ActionRunner>,
    ) -> Self {
        let log = if args.dry_run {
            UpdateLog::disabled()
        } else {
            UpdateLog::new(args.log.clone())
        };
        Self {
            args,
            table,
            checker,
            comparator,
            actions,
            fetcher: None,
            log,
        }
    }

    /// Attach a spec file fetcher for missing specs
    pub fn with_fetcher(mut self, fetcher: Box<dyn SpecFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Run the update workflow
    pub async fn run(&self) -> OrchestratorResult {
        let show_progress = !self.args.quiet && !self.args.json;
        self.run_with_progress(show_progress).await
    }

    /// Run the update workflow with optional progress display
    pub async fn run_with_progress(&self, show_progress: bool) -> OrchestratorResult {
        let mut progress = Progress::new(show_progress);
        let mut summary = RunSummary::new(self.args.dry_run);
        let mut errors = Vec::new();

        let names: Vec<String> = if self.args.has_package_filter() {
            // Selected packages run in table order; names without a table
            // entry are kept so they fail per package
            let mut names: Vec<String> = self
                .table
                .names()
                .into_iter()
                .filter(|n| self.args.should_process_package(n))
                .collect();
            for name in &self.args.packages {
                if self.table.get(name).is_none() && !names.contains(name) {
                    names.push(name.clone());
                }
            }
            names
        } else {
            self.table.names()
        };

        progress.start(names.len() as u64, "Checking packages");
        for name in &names {
            progress.set_message(name);
            let record = match self.process_package(name, &mut errors).await {
                Ok(record) => record,
                Err(e) => {
                    errors.push(OrchestratorError::from_app_error(name, &e));
                    PackageRecord::failed(name, e.to_string())
                }
            };
            summary.add_record(record);
            progress.inc();
        }
        progress.finish_and_clear();

        OrchestratorResult { summary, errors }
    }

    /// Run the whole workflow for one package
    ///
    /// Every step happens in sequence before the next package starts.
    /// Action failures are recorded in `errors` but do not undo an update
    /// that was already applied.
    async fn process_package(
        &self,
        name: &str,
        errors: &mut Vec<OrchestratorError>,
    ) -> Result<PackageRecord, AppError> {
        let descriptor = self
            .table
            .get(name)
            .ok_or_else(|| ConfigError::unknown_package(name))?;

        let spec_path = match specfile::resolve_spec_path(&self.args.specs_dir, name) {
            Some(path) => path,
            None => match &self.fetcher {
                Some(fetcher) => fetcher.fetch_spec(name, &self.args.specs_dir).await?,
                None => return Err(SpecError::not_found(name, &self.args.specs_dir).into()),
            },
        };

        let content = specfile::read_spec(&spec_path)?;
        let fields = specfile::parse_spec(&content, &spec_path)?;

        let raw = self.checker.check(name, descriptor).await?;
        let upstream = descriptor.normalize_version(name, &raw)?;

        let order = self.comparator.compare(&fields.version, &upstream).await?;
        if order != VersionOrder::Newer {
            return Ok(PackageRecord::current(name, fields.version, Some(upstream)));
        }

        if self.args.dry_run {
            return Ok(PackageRecord::updated(name, fields.version, upstream));
        }

        let changed = specfile::apply_update(&spec_path, &upstream)?;
        if !changed {
            // Comparator said newer but the field already matches; nothing
            // to do and nothing to log
            return Ok(PackageRecord::current(name, fields.version, Some(upstream)));
        }

        if let Err(e) = self.log.record(name, &fields.version, &upstream) {
            eprintln!("warning: could not write update log: {}", e);
        }

        self.run_actions(name, &spec_path, &upstream, errors);

        Ok(PackageRecord::updated(name, fields.version, upstream))
    }

    /// Run the optional post-update actions for an applied update
    fn run_actions(
        &self,
        name: &str,
        spec_path: &Path,
        version: &str,
        errors: &mut Vec<OrchestratorError>,
    ) {
        if self.args.download_sources {
            let result = self.actions.download_sources(spec_path);
            if !result.success {
                errors.push(OrchestratorError::ActionFailed {
                    package: name.to_string(),
                    message: format!("{}: {}", result.command, result.stderr.trim()),
                });
            }
        }

        if self.args.commit {
            let result = self.actions.stage_and_commit(spec_path, version);
            if !result.success {
                errors.push(OrchestratorError::ActionFailed {
                    package: name.to_string(),
                    message: format!("{}: {}", result.command, result.stderr.trim()),
                });
            }
        }
    }
}
