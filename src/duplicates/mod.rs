//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Pairwise block comparison with early exit
//! - Equivalence classes over matching files
//! - Incremental duplicate finding over a candidate stream

pub mod comparator;
pub mod finder;
pub mod groups;

pub use comparator::{Comparator, Comparison, FileOpener, FsOpener, Verdict};
pub use finder::{DuplicateFinder, FinderConfig, FinderError, MatchStrategy, ScanSummary};
pub use groups::{DuplicateGroup, EquivalenceClasses};
