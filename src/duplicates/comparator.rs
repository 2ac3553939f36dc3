//! Pairwise content comparison driven by two block hashers in lockstep.
//!
//! # Overview
//!
//! [`Comparator::compare`] decides whether two candidates have identical
//! content:
//!
//! 1. Different sizes are rejected before any file is opened.
//! 2. Two empty files are identical without being opened.
//! 3. Otherwise both files are opened and their block digests are compared
//!    one block at a time. The first disagreement in length or checksum ends
//!    the comparison and nothing further is read from either file.
//! 4. Reaching the end of both streams together without a disagreement means
//!    the files are identical.
//!
//! Each comparison opens its own handles, so independent comparisons can run
//! on different threads without sharing read positions.
//!
//! # Example
//!
//! ```no_run
//! use bayan::duplicates::Comparator;
//! use bayan::scanner::FileCandidate;
//! use std::path::PathBuf;
//!
//! let comparator = Comparator::new(1024).unwrap();
//! let a = FileCandidate::new(PathBuf::from("/tmp/a.bin"), 4096);
//! let b = FileCandidate::new(PathBuf::from("/tmp/b.bin"), 4096);
//!
//! match comparator.compare(&a, &b) {
//!     Ok(true) => println!("duplicates"),
//!     Ok(false) => println!("different"),
//!     Err(e) => eprintln!("Warning: {}", e),
//! }
//! ```

use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;

use crate::config::ConfigError;
use crate::scanner::{BlockHasher, FileCandidate, HashError, DEFAULT_BLOCK_SIZE};

/// Opens candidate files for reading.
///
/// The default [`FsOpener`] opens files from disk; tests substitute an
/// instrumented opener to observe how many files are opened and read.
pub trait FileOpener: Send + Sync {
    /// Reader produced for an opened file.
    type Reader: Read + Seek;

    /// Open `path` for reading from the start.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn open(&self, path: &Path) -> io::Result<Self::Reader>;
}

/// Opens files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOpener;

impl FileOpener for FsOpener {
    type Reader = File;

    fn open(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }
}

/// Result of comparing two candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Both files produced identical block streams.
    Identical,
    /// Sizes differ; no bytes were read.
    SizeMismatch,
    /// The streams disagreed at the given zero-based block.
    ContentMismatch {
        /// Index of the first differing block
        block: u64,
    },
}

impl Verdict {
    /// Whether the two files have identical content.
    #[must_use]
    pub fn is_identical(self) -> bool {
        self == Self::Identical
    }
}

/// A verdict plus the bytes read to reach it (both files combined).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    /// The outcome
    pub verdict: Verdict,
    /// Bytes read from both files
    pub bytes_read: u64,
}

impl Comparison {
    fn unread(verdict: Verdict) -> Self {
        Self {
            verdict,
            bytes_read: 0,
        }
    }
}

/// Decides content equality of two candidates with early termination.
#[derive(Debug, Clone)]
pub struct Comparator<O = FsOpener> {
    block_size: usize,
    opener: O,
}

impl Comparator<FsOpener> {
    /// Create a comparator reading blocks of `block_size` bytes from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBlockSize`] if `block_size` is zero.
    pub fn new(block_size: usize) -> Result<Self, ConfigError> {
        Self::with_opener(block_size, FsOpener)
    }
}

impl Default for Comparator<FsOpener> {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            opener: FsOpener,
        }
    }
}

impl<O: FileOpener> Comparator<O> {
    /// Create a comparator that opens files through `opener`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBlockSize`] if `block_size` is zero.
    pub fn with_opener(block_size: usize, opener: O) -> Result<Self, ConfigError> {
        if block_size == 0 {
            return Err(ConfigError::InvalidBlockSize(0));
        }
        Ok(Self { block_size, opener })
    }

    /// Block size in bytes.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The opener used for every comparison.
    #[must_use]
    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Whether `a` and `b` have identical content.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] naming the file that could not be opened or read.
    pub fn compare(&self, a: &FileCandidate, b: &FileCandidate) -> Result<bool, HashError> {
        Ok(self.compare_detailed(a, b)?.verdict.is_identical())
    }

    /// Compare `a` and `b`, reporting why they differ and how much was read.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] naming the file that could not be opened or read.
    pub fn compare_detailed(
        &self,
        a: &FileCandidate,
        b: &FileCandidate,
    ) -> Result<Comparison, HashError> {
        if a.size != b.size {
            return Ok(Comparison::unread(Verdict::SizeMismatch));
        }
        if a.size == 0 {
            return Ok(Comparison::unread(Verdict::Identical));
        }

        let first = self
            .opener
            .open(&a.path)
            .map_err(|e| HashError::from_io(&a.path, e))?;
        let second = self
            .opener
            .open(&b.path)
            .map_err(|e| HashError::from_io(&b.path, e))?;

        // Equal sizes, so a block never needs to exceed the file itself
        let block_size = usize::try_from(a.size)
            .map_or(self.block_size, |size| self.block_size.min(size));
        let mut left = BlockHasher::new(first, block_size);
        let mut right = BlockHasher::new(second, block_size);
        let mut block = 0u64;

        let verdict = loop {
            match (left.next(), right.next()) {
                (None, None) => break Verdict::Identical,
                (Some(Err(e)), _) => return Err(HashError::from_io(&a.path, e)),
                (_, Some(Err(e))) => return Err(HashError::from_io(&b.path, e)),
                (Some(Ok(x)), Some(Ok(y))) if x == y => block += 1,
                // Differing digests, or one file ended early (changed since discovery)
                _ => break Verdict::ContentMismatch { block },
            }
        };

        if let Verdict::ContentMismatch { block } = verdict {
            log::trace!(
                "Mismatch at block {} between {} and {}",
                block,
                a.path.display(),
                b.path.display()
            );
        }

        Ok(Comparison {
            verdict,
            bytes_read: left.bytes_read() + right.bytes_read(),
        })
    }
}
