//! Bayan - duplicate file finder
//!
//! Bayan compares files block by block using CRC-32 checksums with early
//! exit on the first differing block, and folds the pairwise matches into
//! equivalence classes with a union-find structure.
//!
//! The library is split into:
//!
//! - [`scanner`]: block hashing and candidate discovery
//! - [`duplicates`]: pairwise comparison, equivalence classes, the finder
//! - [`output`]: text, JSON and CSV reports
//! - [`config`], [`cli`], [`logging`], [`progress`], [`error`]: application plumbing

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::Progress;

/// Run a scan described by `cli` and write the report to stdout.
///
/// Logging must already be initialized.
///
/// # Errors
///
/// Returns an error for invalid configuration (before any file is read),
/// missing or invalid roots, strict-mode failures and output errors.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let args = &cli.scan;

    let mut config = Config::load(args.config.as_deref())?;
    config.merge_cli(args);
    config.validate()?;
    log::debug!("Effective configuration: {:?}", config);

    let show_progress = !cli.quiet && !args.no_progress && io::stderr().is_terminal();
    let finder_config = config
        .finder_config()?
        .with_strict(args.strict)
        .with_progress_callback(Arc::new(Progress::new(!show_progress)));

    let finder = DuplicateFinder::new(finder_config)?;
    let (groups, summary) = finder
        .find_duplicates_in_paths(args.directories.clone())
        .context("Scan failed")?;

    for error in &summary.scan_errors {
        log::warn!("Skipped: {}", error);
    }

    let exit_code = ExitCode::from_outcome(&groups, &summary);

    let color = !cli.no_color && io::stdout().is_terminal();
    let stdout = io::stdout().lock();
    match config.output {
        OutputFormat::Text => {
            let mut report = TextOutput::new(&groups).with_color(color);
            if args.summary {
                report = report.with_summary(&summary);
            }
            report.write_to(stdout).context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&groups, &summary, exit_code)
                .write_to(stdout)
                .context("Failed to write JSON report")?;
        }
        OutputFormat::Csv => {
            CsvOutput::new(&groups)
                .write_to(stdout)
                .context("Failed to write CSV report")?;
        }
    }

    Ok(exit_code)
}
