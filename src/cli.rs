//! Command-line interface definitions for Bayan.
//!
//! This module defines all CLI arguments and options using the clap derive API.
//! Global options (verbosity, color, error format) sit next to the scan options.
//!
//! # Example
//!
//! ```bash
//! # List duplicates among the immediate children of two directories
//! bayan ~/Downloads ~/Desktop
//!
//! # Recurse, skip a cache directory, only compare images of at least 1KB
//! bayan -r -e ~/Pictures/.cache -m '*.jpg' -m '*.png' -s 1KB ~/Pictures
//!
//! # JSON output with larger blocks on four threads
//! bayan -r -b 64KiB -j 4 --output json ~/Music
//! ```

use clap::{Args, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::duplicates::MatchStrategy;

/// Find files with identical content.
///
/// Bayan compares candidate files block by block (CRC-32 per block) and
/// prints every group of files whose contents are identical.
#[derive(Debug, Parser)]
#[command(name = "bayan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Scan options
    #[command(flatten)]
    pub scan: ScanArgs,
}

/// Options controlling discovery, comparison and reporting.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directories to scan for duplicates
    #[arg(value_name = "DIRECTORY", required = true)]
    pub directories: Vec<PathBuf>,

    /// Directory to exclude from the scan (can be specified multiple times)
    #[arg(short, long = "exclude", value_name = "DIR")]
    pub excludes: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Only scan the top level of each directory, even if the config file enables recursion
    #[arg(long, conflicts_with = "recursive")]
    pub no_recursive: bool,

    /// Minimum file size to consider (default: 1 byte)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(short = 's', long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// File name wildcard, e.g. '*.jpg' (can be specified multiple times)
    ///
    /// `*` matches any run of characters and `?` a single character.
    /// Matching is case-insensitive.
    #[arg(short, long = "mask", value_name = "PATTERN")]
    pub masks: Vec<String>,

    /// Bytes read per comparison block (default: 1024)
    ///
    /// Supports the same suffixes as --min-size.
    #[arg(short, long, value_name = "SIZE", value_parser = parse_size)]
    pub block_size: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Number of threads comparing files (default: 1)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// How a new file is matched against files seen before it
    #[arg(long, value_enum)]
    pub strategy: Option<MatchStrategy>,

    /// Abort on the first unreadable file or directory
    #[arg(long)]
    pub strict: bool,

    /// Print a summary line after the text report
    #[arg(long)]
    pub summary: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Hide the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

impl ScanArgs {
    /// Recursion as requested on the command line, if at all.
    #[must_use]
    pub fn recursion(&self) -> Option<bool> {
        match (self.recursive, self.no_recursive) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Output format for scan results.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text groups separated by a rule
    #[default]
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use bayan::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    if s.starts_with('-') {
        return Err("Size cannot be negative".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
