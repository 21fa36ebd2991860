//! specup - RPM spec file autoupdater library
//!
//! This library provides the core functionality for keeping RPM spec
//! files in sync with upstream releases:
//! - nvchecker-style source table handling
//! - external checker and comparator invocation
//! - atomic spec file rewriting with git/spectool follow-up actions

pub mod checker;
pub mod cli;
pub mod compare;
pub mod config;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod remote;
pub mod report;
pub mod specfile;
pub mod vcs;
