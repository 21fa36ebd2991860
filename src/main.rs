//! specup - RPM spec file autoupdater
//!
//! Reads an nvchecker-style source table, looks up each package's latest
//! upstream version, and rewrites the package's spec file when upstream
//! is newer than the recorded version.

use clap::Parser;
use specup::cli::CliArgs;
use specup::orchestrator::Orchestrator;
use specup::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("specup v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Source table: {}", args.config.display());
        eprintln!("Specs dir: {}", args.specs_dir.display());
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    // A missing or malformed source table is fatal
    let orchestrator = Orchestrator::new(args.clone())?;
    let result = orchestrator.run().await;

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.dry_run);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    // Non-zero exit if any package failed to update
    if result.summary.has_failures() || !result.errors.is_empty() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
