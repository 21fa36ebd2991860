//! CLI argument parsing module for specup

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// RPM spec file autoupdater driven by nvchecker
#[derive(Parser, Debug, Clone)]
#[command(name = "specup", version, about = "RPM spec file autoupdater")]
pub struct CliArgs {
    /// Source table (nvchecker-style TOML, one section per package)
    #[arg(default_value = "sources.toml")]
    pub config: PathBuf,

    /// Process only this package (can be specified multiple times)
    #[arg(short = 'p', long = "package", value_name = "NAME", action = ArgAction::Append)]
    pub packages: Vec<String>,

    /// Directory under which spec files live
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub specs_dir: PathBuf,

    // General options
    /// Dry run mode - report what would be updated without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Append a result line per update to this log file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    // Post-update actions
    /// Stage and commit each updated spec file with git
    #[arg(long)]
    pub commit: bool,

    /// Download sources with `spectool -g` after an update
    #[arg(long)]
    pub download_sources: bool,

    // Forge fetch options
    /// Download a missing spec file from the packaging forge
    #[arg(long)]
    pub fetch: bool,

    /// Forge branch to fetch spec files from
    #[arg(long, value_name = "BRANCH", default_value = "rosa2023.1")]
    pub branch: String,

    /// Forge base URL for spec file downloads
    #[arg(long, value_name = "URL", default_value = "https://abf.io/import")]
    pub base_url: String,

    // External tool overrides
    /// Version checker command
    #[arg(long, value_name = "CMD", default_value = "nvchecker")]
    pub checker_cmd: String,

    /// Version comparator command
    #[arg(long, value_name = "CMD", default_value = "rpmdev-vercmp")]
    pub comparator_cmd: String,
}

impl CliArgs {
    /// Check if a package selection was given on the command line
    pub fn has_package_filter(&self) -> bool {
        !self.packages.is_empty()
    }

    /// Check if a package should be processed based on the selection
    pub fn should_process_package(&self, name: &str) -> bool {
        self.packages.is_empty() || self.packages.iter().any(|p| p == name)
    }
}
