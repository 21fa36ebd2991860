//! Core domain models for specup
//!
//! This module contains the fundamental types used throughout the
//! application:
//! - Three-way version ordering result
//! - Per-package run records and outcomes
//! - Whole-run summary

mod record;
mod summary;

pub use record::{PackageOutcome, PackageRecord, VersionOrder};
pub use summary::RunSummary;
