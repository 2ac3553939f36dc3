//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Text for people, one group per block
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use bayan::duplicates::DuplicateFinder;
//! use bayan::output::TextOutput;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates_in_paths(vec![PathBuf::from(".")]).unwrap();
//!
//! TextOutput::new(&groups)
//!     .with_summary(&summary)
//!     .write_to(std::io::stdout())
//!     .unwrap();
//! ```

pub mod csv;
pub mod json;
pub mod text;

// Re-export main types
pub use csv::{CsvOutput, CsvOutputError};
pub use json::JsonOutput;
pub use text::TextOutput;
