//! Equivalence classes of duplicate files.
//!
//! # Overview
//!
//! Pairwise "these two files match" facts are folded into a disjoint-set
//! forest (union-find with path halving and union by rank). Every candidate
//! gets an index in discovery order; a positive comparison unions the two
//! indices. Because union merges whole classes, a new file that matches two
//! files not yet known to be equal pulls both classes together, so the
//! partition stays transitively closed whatever order the facts arrive in.
//!
//! Classes only ever merge. Files that became unreadable are filtered out
//! when the final classes are read, and classes left with fewer than two
//! members are dropped.
//!
//! # Example
//!
//! ```
//! use bayan::duplicates::EquivalenceClasses;
//!
//! let mut classes = EquivalenceClasses::new();
//! let a = classes.add();
//! let b = classes.add();
//! let c = classes.add();
//!
//! // dup(a, c) then dup(b, c): a and b end up together without being compared
//! classes.union(a, c);
//! classes.union(b, c);
//!
//! assert!(classes.same_class(a, b));
//! assert_eq!(classes.classes(&[]), vec![vec![a, b, c]]);
//! ```

use serde::Serialize;
use std::path::PathBuf;

/// Disjoint-set forest over candidate indices.
#[derive(Debug, Clone, Default)]
pub struct EquivalenceClasses {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl EquivalenceClasses {
    /// Create an empty forest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forest with room for `capacity` candidates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            parent: Vec::with_capacity(capacity),
            rank: Vec::with_capacity(capacity),
        }
    }

    /// Add a new singleton and return its index.
    pub fn add(&mut self) -> usize {
        let index = self.parent.len();
        self.parent.push(index);
        self.rank.push(0);
        index
    }

    /// Number of indices in the forest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the forest is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of the class containing `index`, halving the path on the way.
    ///
    /// # Panics
    ///
    /// Panics if `index` was never added.
    pub fn find(&mut self, mut index: usize) -> usize {
        while self.parent[index] != index {
            let grandparent = self.parent[self.parent[index]];
            self.parent[index] = grandparent;
            index = grandparent;
        }
        index
    }

    /// Merge the classes of `a` and `b`.
    ///
    /// Returns `true` if two distinct classes were merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }

        let (high, low) = if self.rank[root_a] >= self.rank[root_b] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent[low] = high;
        if self.rank[high] == self.rank[low] {
            self.rank[high] += 1;
        }
        true
    }

    /// Whether `a` and `b` are in the same class.
    pub fn same_class(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Partition the first `upto` indices into classes, skipping excluded ones.
    ///
    /// Singletons are included. Members are listed in ascending index order
    /// and classes are ordered by their first member, so the lowest-index
    /// member of each class comes first.
    ///
    /// `excluded[i] == true` removes index `i`; indices past the end of
    /// `excluded` are kept.
    pub fn partition(&mut self, upto: usize, excluded: &[bool]) -> Vec<Vec<usize>> {
        let upto = upto.min(self.len());
        let mut slot_of_root: Vec<Option<usize>> = vec![None; self.len()];
        let mut classes: Vec<Vec<usize>> = Vec::new();

        for index in 0..upto {
            if excluded.get(index).copied().unwrap_or(false) {
                continue;
            }
            let root = self.find(index);
            match slot_of_root[root] {
                Some(slot) => classes[slot].push(index),
                None => {
                    slot_of_root[root] = Some(classes.len());
                    classes.push(vec![index]);
                }
            }
        }
        classes
    }

    /// Final duplicate classes: excluded indices removed, size ≥ 2 only.
    pub fn classes(&mut self, excluded: &[bool]) -> Vec<Vec<usize>> {
        let len = self.len();
        self.partition(len, excluded)
            .into_iter()
            .filter(|class| class.len() > 1)
            .collect()
    }
}

/// Confirmed duplicate group of files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// File size in bytes (shared by all files in the group)
    pub size: u64,
    /// Paths of the duplicate files in discovery order
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(size: u64, files: Vec<PathBuf>) -> Self {
        Self { size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Space that removing all but one copy would reclaim.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * (self.files.len() as u64).saturating_sub(1)
    }
}
