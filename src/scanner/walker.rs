//! Candidate source built on jwalk.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct which traverses one or more
//! root directories and lazily yields [`FileCandidate`] values that already
//! satisfy every upstream filter:
//!
//! - regular file (symbolic links are not followed)
//! - size at or above the configured minimum
//! - file name matches at least one wildcard mask
//! - not located under an excluded directory
//!
//! Excluded directories are pruned while reading their parent, so their
//! contents are never listed. Children are sorted by file name, which makes
//! discovery order deterministic across runs.
//!
//! # Example
//!
//! ```no_run
//! use bayan::scanner::{Walker, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let walker = Walker::new(vec![PathBuf::from("/home/user/Photos")], WalkerConfig::default())
//!     .expect("valid roots");
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} candidates", files.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jwalk::WalkDir;
use regex::{Regex, RegexBuilder};

use super::{FileCandidate, ScanError, WalkerConfig};

/// Translate a wildcard mask into an anchored regex pattern.
///
/// `*` matches any run of characters, `?` matches exactly one character,
/// everything else is matched literally.
///
/// # Example
///
/// ```
/// use bayan::scanner::wildcard_to_regex;
///
/// assert_eq!(wildcard_to_regex("*.txt"), r"^.*\.txt$");
/// assert_eq!(wildcard_to_regex("img?"), "^img.$");
/// ```
#[must_use]
pub fn wildcard_to_regex(mask: &str) -> String {
    let mut pattern = String::with_capacity(mask.len() * 2 + 2);
    pattern.push('^');
    for c in mask.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');
    pattern
}

/// Directory walker yielding comparison candidates.
#[derive(Debug)]
pub struct Walker {
    /// Canonical root directories, nested duplicates removed
    roots: Vec<PathBuf>,
    /// Walker configuration
    config: WalkerConfig,
    /// Compiled file name masks
    masks: Vec<Regex>,
    /// Canonical excluded directories
    excludes: Arc<Vec<PathBuf>>,
}

impl Walker {
    /// Create a new walker over the given roots.
    ///
    /// Roots are canonicalized. When walking recursively, a root nested
    /// inside another root is dropped so that no file is yielded twice.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if a root does not exist, is not a directory,
    /// or a mask cannot be compiled.
    pub fn new(roots: Vec<PathBuf>, config: WalkerConfig) -> Result<Self, ScanError> {
        let mut canonical = Vec::with_capacity(roots.len());
        for root in roots {
            if !root.exists() {
                return Err(ScanError::NotFound(root));
            }
            if !root.is_dir() {
                return Err(ScanError::NotADirectory(root));
            }
            let path = root.canonicalize().map_err(|source| ScanError::Io {
                path: root.clone(),
                source,
            })?;
            canonical.push(path);
        }

        let roots = dedup_roots(canonical, config.recursive);

        let masks = config
            .masks
            .iter()
            .map(|mask| {
                RegexBuilder::new(&wildcard_to_regex(mask))
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ScanError::InvalidMask {
                        mask: mask.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Excludes that do not exist cannot match anything; keep them as given.
        let excludes = config
            .excludes
            .iter()
            .map(|p| p.canonicalize().unwrap_or_else(|_| p.clone()))
            .collect();

        Ok(Self {
            roots,
            config,
            masks,
            excludes: Arc::new(excludes),
        })
    }

    /// The canonical roots that will be walked, in walk order.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Check if a file name passes the mask filter.
    fn passes_mask_filter(&self, path: &Path) -> bool {
        if self.masks.is_empty() {
            return true;
        }
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        self.masks.iter().any(|re| re.is_match(&filename))
    }

    /// Walk every root in order, yielding candidates lazily.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileCandidate, ScanError>> + '_ {
        self.roots.iter().flat_map(move |root| self.walk_root(root))
    }

    fn walk_root<'a>(
        &'a self,
        root: &'a Path,
    ) -> impl Iterator<Item = Result<FileCandidate, ScanError>> + 'a {
        let excludes = Arc::clone(&self.excludes);

        let mut walk_dir = WalkDir::new(root)
            .follow_links(false)
            .skip_hidden(false)
            .process_read_dir(move |_depth, _path, _read_dir_state, children| {
                // Prune excluded directories before they are read
                children.retain(|entry| match entry {
                    Ok(e) if e.file_type().is_dir() => {
                        let path = e.path();
                        let excluded = excludes.iter().any(|x| *x == path);
                        if excluded {
                            log::debug!("Excluding directory: {}", path.display());
                        }
                        !excluded
                    }
                    _ => true,
                });

                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });

        if !self.config.recursive {
            walk_dir = walk_dir.max_depth(1);
        }

        walk_dir
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }
                    let path = entry.path();
                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", path.display());
                        return None;
                    }
                    self.process_file_entry(path)
                }
                Err(e) => {
                    let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    Some(Err(handle_jwalk_error(path, &e)))
                }
            })
    }

    /// Apply the file filters, producing a candidate if it qualifies.
    fn process_file_entry(&self, path: PathBuf) -> Option<Result<FileCandidate, ScanError>> {
        let metadata = match std::fs::symlink_metadata(&path) {
            Ok(m) => m,
            Err(e) => return Some(Err(handle_io_error(&path, e))),
        };

        if !metadata.is_file() {
            return None;
        }

        let size = metadata.len();
        if size < self.config.min_size {
            log::trace!(
                "Skipping file below minimum size ({}): {}",
                size,
                path.display()
            );
            return None;
        }

        if !self.passes_mask_filter(&path) {
            log::trace!("Skipping file not matching masks: {}", path.display());
            return None;
        }

        Some(Ok(FileCandidate::new(path, size)))
    }
}

/// Remove repeated roots, and roots nested in another root when recursive.
///
/// The remaining roots keep the order they were given in.
fn dedup_roots(roots: Vec<PathBuf>, recursive: bool) -> Vec<PathBuf> {
    let mut kept: Vec<PathBuf> = Vec::with_capacity(roots.len());
    for (i, root) in roots.iter().enumerate() {
        let repeated = roots[..i].contains(root);
        let nested = recursive
            && roots
                .iter()
                .any(|other| other != root && root.starts_with(other));
        if repeated || nested {
            log::debug!("Skipping root already covered: {}", root.display());
        } else {
            kept.push(root.clone());
        }
    }
    kept
}

/// Handle I/O errors during file access.
fn handle_io_error(path: &Path, error: std::io::Error) -> ScanError {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::PermissionDenied => {
            log::warn!("Permission denied: {}", path.display());
            ScanError::PermissionDenied(path.to_path_buf())
        }
        ErrorKind::NotFound => {
            log::debug!("File not found (may have been deleted): {}", path.display());
            ScanError::NotFound(path.to_path_buf())
        }
        _ => {
            log::warn!("I/O error for {}: {}", path.display(), error);
            ScanError::Io {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}

/// Handle jwalk errors.
fn handle_jwalk_error(path: PathBuf, error: &jwalk::Error) -> ScanError {
    if error
        .io_error()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
    {
        log::warn!("Permission denied: {}", path.display());
        return ScanError::PermissionDenied(path);
    }
    log::warn!("Walker error for {}: {}", path.display(), error);
    ScanError::Io {
        path,
        source: std::io::Error::other(error.to_string()),
    }
}
