//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Exit codes for the Bayan application.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (unexpected failure)
/// - 2: No duplicates found (completed normally, no duplicates)
/// - 3: Partial success (duplicates found, some files could not be read)
/// - 4: Configuration error (rejected before scanning)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and duplicates were found.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Partial success: Duplicates were found but some files were skipped.
    PartialSuccess = 3,
    /// Configuration error: Invalid block size, thread count or config file.
    ConfigError = 4,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "BY000",
            Self::GeneralError => "BY001",
            Self::NoDuplicates => "BY002",
            Self::PartialSuccess => "BY003",
            Self::ConfigError => "BY004",
        }
    }

    /// Map a completed scan to its exit code.
    ///
    /// Skipped files only matter when there is something to report.
    #[must_use]
    pub fn from_outcome(groups: &[DuplicateGroup], summary: &ScanSummary) -> Self {
        if groups.is_empty() {
            Self::NoDuplicates
        } else if summary.has_errors() {
            Self::PartialSuccess
        } else {
            Self::Success
        }
    }

    /// Classify a fatal error from [`run_app`](crate::run_app).
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        let config_error = err.chain().any(|cause| {
            cause.downcast_ref::<crate::config::ConfigError>().is_some()
                || cause
                    .downcast_ref::<crate::duplicates::FinderError>()
                    .is_some_and(|e| matches!(e, crate::duplicates::FinderError::Config(_)))
        });
        if config_error {
            Self::ConfigError
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "BY001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
