//! Duplicate finder: incremental equivalence-class building.
//!
//! # Overview
//!
//! Candidates are consumed one at a time in discovery order. Each new file is
//! compared against the files discovered before it and every positive match
//! is merged into the [`EquivalenceClasses`] forest:
//!
//! - [`MatchStrategy::Representative`] compares the new file against one
//!   member of every existing class. Class members are already known to be
//!   equal, so one comparison per class suffices; unclassified files are
//!   classes of one and are therefore each compared directly.
//! - [`MatchStrategy::Exhaustive`] compares against every prior file.
//!
//! Both strategies produce the same partition. The comparator rejects
//! different sizes without I/O and stops at the first differing block, so
//! most comparisons are cheap.
//!
//! # Unreadable files
//!
//! A file that cannot be opened or read is excluded from every later
//! comparison and from the output, and its error is recorded in
//! [`ScanSummary::hash_errors`]. If a class representative fails, the next
//! member of that class is tried. If the new file itself fails, none of its
//! matches are merged.
//!
//! # Concurrency
//!
//! With `threads > 1` the comparisons for one new file run on a rayon pool.
//! Every comparison opens its own handles, and merges are applied by the
//! calling thread only after the round completes.
//!
//! # Example
//!
//! ```no_run
//! use bayan::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default()).unwrap();
//! let (groups, summary) = finder
//!     .find_duplicates_in_paths(vec![PathBuf::from(".")])
//!     .unwrap();
//!
//! for group in &groups {
//!     println!("{} copies of {} bytes", group.len(), group.size);
//! }
//! println!("Reclaimable: {}", summary.reclaimable_display());
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::comparator::{Comparator, Comparison, FileOpener, FsOpener, Verdict};
use super::groups::{DuplicateGroup, EquivalenceClasses};
use crate::config::ConfigError;
use crate::progress::ProgressCallback;
use crate::scanner::{FileCandidate, HashError, ScanError, Walker, WalkerConfig, DEFAULT_BLOCK_SIZE};

/// How a new candidate is matched against earlier ones.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// One comparison per existing class.
    #[default]
    Representative,
    /// One comparison per earlier file.
    Exhaustive,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Representative => write!(f, "representative"),
            Self::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Block size in bytes for incremental comparison.
    pub block_size: usize,
    /// Number of threads running comparisons. 1 runs everything inline.
    pub threads: usize,
    /// Matching strategy.
    pub strategy: MatchStrategy,
    /// Fail on the first scan or read error instead of skipping the file.
    pub strict: bool,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("block_size", &self.block_size)
            .field("threads", &self.threads)
            .field("strategy", &self.strategy)
            .field("strict", &self.strict)
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            threads: 1,
            strategy: MatchStrategy::default(),
            strict: false,
            walker_config: WalkerConfig::default(),
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the block size.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the number of comparison threads.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Set the matching strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set fail-fast on any error.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Number of candidates admitted
    pub total_files: usize,
    /// Total size of all candidates in bytes
    pub total_size: u64,
    /// Number of pairwise comparisons performed
    pub comparisons: usize,
    /// Comparisons rejected by size without reading
    pub size_rejections: usize,
    /// Comparisons that read content and found a difference
    pub content_mismatches: usize,
    /// Bytes read across all comparisons
    pub bytes_compared: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding one original per group)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Errors encountered while discovering candidates
    pub scan_errors: Vec<ScanError>,
    /// Files excluded because they could not be read
    pub hash_errors: Vec<HashError>,
}

impl ScanSummary {
    /// Whether any file was skipped because of an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty() || !self.hash_errors.is_empty()
    }

    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize::b(self.reclaimable_space).to_string()
    }

    fn record(&mut self, comparison: &Comparison) {
        self.comparisons += 1;
        self.bytes_compared += comparison.bytes_read;
        match comparison.verdict {
            Verdict::SizeMismatch => self.size_rejections += 1,
            Verdict::ContentMismatch { .. } => self.content_mismatches += 1,
            Verdict::Identical => {}
        }
    }
}

/// Errors that stop a duplicate scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// Invalid configuration, detected before any scanning.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A scan error occurred (fatal for roots, or any error in strict mode).
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A file could not be read (strict mode only).
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Candidate list, union-find forest and exclusion flags for one run.
///
/// Mutated only by the thread driving the finder.
#[derive(Debug, Default)]
struct ClassBuilder {
    files: Vec<FileCandidate>,
    classes: EquivalenceClasses,
    excluded: Vec<bool>,
}

impl ClassBuilder {
    fn push(&mut self, candidate: FileCandidate) -> usize {
        self.files.push(candidate);
        self.excluded.push(false);
        self.classes.add()
    }

    fn exclude(&mut self, index: usize) {
        self.excluded[index] = true;
    }

    fn is_excluded(&self, index: usize) -> bool {
        self.excluded[index]
    }

    fn into_groups(mut self) -> Vec<DuplicateGroup> {
        self.classes
            .classes(&self.excluded)
            .into_iter()
            .map(|members| {
                let size = self.files[members[0]].size;
                let files = members
                    .into_iter()
                    .map(|i| std::mem::take(&mut self.files[i].path))
                    .collect();
                DuplicateGroup::new(size, files)
            })
            .collect()
    }
}

/// A pending comparison: the earlier file and the class slot it stands for.
#[derive(Debug, Clone, Copy)]
struct Target {
    index: usize,
    slot: usize,
}

/// Duplicate finder driving the comparator and the class builder.
pub struct DuplicateFinder<O: FileOpener = FsOpener> {
    config: FinderConfig,
    comparator: Comparator<O>,
    pool: Option<rayon::ThreadPool>,
}

impl DuplicateFinder<FsOpener> {
    /// Create a new duplicate finder with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] if the block size is zero.
    pub fn new(config: FinderConfig) -> Result<Self, FinderError> {
        Self::with_opener(config, FsOpener)
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: FinderConfig::default(),
            comparator: Comparator::default(),
            pool: None,
        }
    }
}

impl<O: FileOpener> DuplicateFinder<O> {
    /// Create a duplicate finder that opens files through `opener`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] if the block size is zero.
    pub fn with_opener(config: FinderConfig, opener: O) -> Result<Self, FinderError> {
        let comparator = Comparator::with_opener(config.block_size, opener)?;
        let pool = build_pool(config.threads);
        Ok(Self {
            config,
            comparator,
            pool,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Walk `roots` and group the discovered files.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Scan`] if a root is missing or not a directory,
    /// or a mask is invalid. In strict mode, any scan or read error is fatal.
    pub fn find_duplicates_in_paths(
        &self,
        roots: Vec<PathBuf>,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let walker = Walker::new(roots, self.config.walker_config.clone())?;
        for root in walker.roots() {
            log::info!("Scanning {}", root.display());
        }
        self.find_duplicates_from_candidates(walker.walk())
    }

    /// Group candidates supplied by any source.
    ///
    /// Candidates are admitted in iteration order; discovery errors are
    /// recorded and skipped unless strict mode is on.
    ///
    /// # Errors
    ///
    /// Only in strict mode: the first scan or read error.
    pub fn find_duplicates_from_candidates<I>(
        &self,
        candidates: I,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError>
    where
        I: IntoIterator<Item = Result<FileCandidate, ScanError>>,
    {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();
        let mut builder = ClassBuilder::default();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("comparing", 0);
        }

        for result in candidates {
            let candidate = match result {
                Ok(candidate) => candidate,
                Err(e) => {
                    if self.config.strict {
                        return Err(FinderError::Scan(e));
                    }
                    summary.scan_errors.push(e);
                    continue;
                }
            };

            summary.total_files += 1;
            summary.total_size += candidate.size;
            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(summary.total_files, &candidate.path.to_string_lossy());
            }

            self.admit(&mut builder, candidate, &mut summary)?;
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("comparing");
        }

        let groups = builder.into_groups();
        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(|g| g.len() - 1).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Compared {} files ({} comparisons, {} rejected by size): {} duplicate groups, {} reclaimable",
            summary.total_files,
            summary.comparisons,
            summary.size_rejections,
            summary.duplicate_groups,
            summary.reclaimable_display()
        );

        Ok((groups, summary))
    }

    /// Compare a new candidate against the earlier ones and merge matches.
    fn admit(
        &self,
        builder: &mut ClassBuilder,
        candidate: FileCandidate,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        let index = builder.push(candidate);
        let prior = builder.classes.partition(index, &builder.excluded);

        // Members still available to stand in for each class slot
        let mut fallbacks: Vec<std::vec::IntoIter<usize>> = Vec::new();
        let mut targets: Vec<Target> = Vec::new();
        match self.config.strategy {
            MatchStrategy::Exhaustive => {
                for index in prior.into_iter().flatten() {
                    let slot = fallbacks.len();
                    fallbacks.push(Vec::new().into_iter());
                    targets.push(Target { index, slot });
                }
            }
            MatchStrategy::Representative => {
                for class in prior {
                    let slot = fallbacks.len();
                    let mut members = class.into_iter();
                    if let Some(first) = members.next() {
                        targets.push(Target { index: first, slot });
                    }
                    fallbacks.push(members);
                }
            }
        }

        let mut matches: Vec<usize> = Vec::new();
        while !targets.is_empty() {
            let results = self.compare_round(&builder.files, index, &targets);
            let mut retry = Vec::new();

            for (target, result) in targets.iter().zip(results) {
                match result {
                    Ok(comparison) => {
                        summary.record(&comparison);
                        if comparison.verdict.is_identical() {
                            log::debug!(
                                "Duplicate: {} == {}",
                                builder.files[index].path.display(),
                                builder.files[target.index].path.display()
                            );
                            matches.push(target.index);
                        }
                    }
                    Err(e) => {
                        summary.comparisons += 1;
                        if self.config.strict {
                            return Err(FinderError::Hash(e));
                        }
                        if e.path() == builder.files[index].path {
                            self.skip_unreadable(builder, index, e, summary);
                            return Ok(());
                        }
                        if !builder.is_excluded(target.index) {
                            self.skip_unreadable(builder, target.index, e, summary);
                        }
                        if let Some(next) = fallbacks[target.slot].next() {
                            retry.push(Target {
                                index: next,
                                slot: target.slot,
                            });
                        }
                    }
                }
            }
            targets = retry;
        }

        for other in matches {
            builder.classes.union(index, other);
        }
        Ok(())
    }

    fn skip_unreadable(
        &self,
        builder: &mut ClassBuilder,
        index: usize,
        error: HashError,
        summary: &mut ScanSummary,
    ) {
        log::warn!("Skipping unreadable file: {}", error);
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_message(&format!("skipped {}", error.path().display()));
        }
        builder.exclude(index);
        summary.hash_errors.push(error);
    }

    /// Run one round of comparisons, inline or on the pool.
    fn compare_round(
        &self,
        files: &[FileCandidate],
        index: usize,
        targets: &[Target],
    ) -> Vec<Result<Comparison, HashError>> {
        let candidate = &files[index];
        let compare = |target: &Target| {
            self.comparator
                .compare_detailed(candidate, &files[target.index])
        };

        match self.pool {
            Some(ref pool) if targets.len() > 1 => {
                pool.install(|| targets.par_iter().map(compare).collect())
            }
            _ => targets.iter().map(compare).collect(),
        }
    }
}

/// Build a dedicated comparison pool, or `None` to run inline.
fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    if threads <= 1 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => Some(pool),
        Err(e) => {
            log::warn!("Failed to create thread pool, comparing sequentially: {}", e);
            None
        }
    }
}
