//! Scanner module for candidate discovery and block hashing.
//!
//! This module provides functionality for:
//! - Directory walking with mask, size and exclusion filters
//! - Incremental CRC-32 block hashing
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`hasher`]: Fixed-size block checksum stream over a single file
//!
//! # Example
//!
//! ```no_run
//! use bayan::scanner::{Walker, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let config = WalkerConfig {
//!     recursive: true,
//!     min_size: 1024,
//!     masks: vec!["*.jpg".to_string()],
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(vec![PathBuf::from(".")], config).unwrap();
//! for candidate in walker.walk() {
//!     match candidate {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{BlockDigest, BlockHasher, DEFAULT_BLOCK_SIZE};
pub use walker::{wildcard_to_regex, Walker};

/// A file admitted into the comparison process.
///
/// The size is captured once at discovery time and never re-read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileCandidate {
    /// Canonical path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileCandidate {
    /// Create a new candidate.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for candidate discovery.
///
/// Controls recursion, filtering and exclusion pruning.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Descend into nested directories.
    /// When false only the immediate children of each root are listed.
    pub recursive: bool,

    /// Minimum file size to include (in bytes).
    pub min_size: u64,

    /// Wildcard masks (`*`, `?`) matched case-insensitively against file names.
    /// An empty list admits every file.
    pub masks: Vec<String>,

    /// Directories that are never entered.
    pub excludes: Vec<PathBuf>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            min_size: 1,
            masks: Vec::new(),
            excludes: Vec::new(),
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration from CLI arguments.
    #[must_use]
    pub fn new(recursive: bool, min_size: u64, masks: Vec<String>, excludes: Vec<PathBuf>) -> Self {
        Self {
            recursive,
            min_size,
            masks,
            excludes,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A file mask could not be compiled.
    #[error("Invalid mask '{mask}': {source}")]
    InvalidMask {
        /// The mask as given by the user
        mask: String,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// A candidate could not be opened or read during comparison.
///
/// The file is excluded from grouping; the scan continues.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file vanished after discovery.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while opening or reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// The file that could not be read.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path) | Self::PermissionDenied(path) => path,
            Self::Io { path, .. } => path,
        }
    }
}
