//! Size and digest bucket structures.
//!
//! # Overview
//!
//! Size grouping is the first filter of duplicate detection. Files with
//! different sizes cannot be duplicates, so bucketing by exact size prunes the
//! expensive hashing work to candidate files only. No file I/O happens here.
//!
//! Buckets are held in size order so that every listing can be produced in the
//! run's [`SortOrder`] without re-sorting. Within a bucket, files keep the
//! order in which the walk produced them.
//!
//! # Example
//!
//! ```
//! use dupsweep::scanner::FileRecord;
//! use dupsweep::duplicates::{group_by_size, SortOrder};
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/file1.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file2.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups.iter(SortOrder::Ascending).next().unwrap().0, 1024);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scanner::{hash_to_hex, FileRecord, Hash};

/// Order in which size-keyed listings are enumerated.
///
/// Chosen once per run and applied to every size-ordered listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Largest size first
    #[default]
    Descending,
    /// Smallest size first
    Ascending,
}

impl SortOrder {
    /// Resolve the numbered menu option used by the interactive prompt.
    ///
    /// `"1"` selects descending and `"2"` ascending; anything else is rejected.
    #[must_use]
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::Descending),
            "2" => Some(Self::Ascending),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Descending => write!(f, "descending"),
            SortOrder::Ascending => write!(f, "ascending"),
        }
    }
}

/// Iterate a size-keyed map in the requested order.
fn ordered<V>(
    map: &BTreeMap<u64, V>,
    order: SortOrder,
) -> Box<dyn Iterator<Item = (&u64, &V)> + '_> {
    match order {
        SortOrder::Ascending => Box::new(map.iter()),
        SortOrder::Descending => Box::new(map.iter().rev()),
    }
}

/// Files bucketed by exact size, keeping only buckets with 2+ files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeGroups {
    buckets: BTreeMap<u64, Vec<FileRecord>>,
}

impl SizeGroups {
    /// Number of surviving size buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if no bucket survived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Files sharing the given size, if that bucket survived.
    #[must_use]
    pub fn get(&self, size: u64) -> Option<&[FileRecord]> {
        self.buckets.get(&size).map(Vec::as_slice)
    }

    /// Total number of files across all buckets.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Iterate `(size, files)` in the given order.
    pub fn iter(&self, order: SortOrder) -> impl Iterator<Item = (u64, &[FileRecord])> + '_ {
        ordered(&self.buckets, order).map(|(size, files)| (*size, files.as_slice()))
    }

    /// Consume the groups, yielding buckets in ascending size order.
    pub fn into_buckets(self) -> impl Iterator<Item = (u64, Vec<FileRecord>)> {
        self.buckets.into_iter()
    }
}

/// Confirmed duplicate group: files sharing both size and digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// BLAKE3 hash of the file content
    pub hash: Hash,
    /// File size in bytes (shared by all files)
    pub size: u64,
    /// Files in arrival order
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(hash: Hash, size: u64, files: Vec<FileRecord>) -> Self {
        Self { hash, size, files }
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

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.files.len().saturating_sub(1) as u64
    }

    /// Hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

/// Duplicate groups bucketed by size.
///
/// Within a size, groups keep the order in which their first member arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashGroups {
    buckets: BTreeMap<u64, Vec<DuplicateGroup>>,
}

impl HashGroups {
    /// Build from per-size group lists, dropping sizes with no groups.
    #[must_use]
    pub fn from_buckets(buckets: impl IntoIterator<Item = (u64, Vec<DuplicateGroup>)>) -> Self {
        Self {
            buckets: buckets
                .into_iter()
                .filter(|(_, groups)| !groups.is_empty())
                .collect(),
        }
    }

    /// Check if no duplicate group exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of distinct sizes holding duplicates.
    #[must_use]
    pub fn size_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of duplicate groups across all sizes.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Number of files across all duplicate groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups().map(DuplicateGroup::len).sum()
    }

    /// Space reclaimable by keeping one copy per group.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.groups().map(DuplicateGroup::wasted_space).sum()
    }

    /// Iterate `(size, groups)` in the given order.
    pub fn iter(&self, order: SortOrder) -> impl Iterator<Item = (u64, &[DuplicateGroup])> + '_ {
        ordered(&self.buckets, order).map(|(size, groups)| (*size, groups.as_slice()))
    }

    fn groups(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.buckets.values().flatten()
    }
}

/// Statistics from the size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size.
///
/// Every input record lands in the bucket for its exact size; buckets with a
/// single file are then dropped. Zero-byte files are grouped like any other
/// size.
///
/// # Performance
///
/// - Time complexity: O(n log k) for n files and k distinct sizes
/// - No file I/O is performed
///
/// # Example
///
/// ```
/// use dupsweep::scanner::FileRecord;
/// use dupsweep::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileRecord::new(PathBuf::from("/a.txt"), 100),
///     FileRecord::new(PathBuf::from("/b.txt"), 100),
///     FileRecord::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups.get(100).unwrap().len(), 2);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(files: impl IntoIterator<Item = FileRecord>) -> (SizeGroups, GroupingStats) {
    let mut all_groups: BTreeMap<u64, Vec<FileRecord>> = BTreeMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        all_groups.entry(file.size).or_default().push(file);
    }

    stats.unique_sizes = all_groups.len();

    all_groups.retain(|size, files| {
        if files.len() == 1 {
            stats.eliminated_unique += 1;
            log::trace!("Eliminated unique size {}: {}", size, files[0].path.display());
            false
        } else {
            stats.potential_duplicates += files.len();
            stats.duplicate_groups += 1;
            log::debug!("Size group {} bytes: {} potential duplicates", size, files.len());
            true
        }
    });

    log::info!(
        "Size grouping complete: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (SizeGroups { buckets: all_groups }, stats)
}
