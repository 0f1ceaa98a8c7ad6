//! Numbered catalog of confirmed duplicates.
//!
//! The catalog is the only way an operator refers to files for deletion, so
//! its order is fixed once built:
//!
//! 1. sizes in the run's [`SortOrder`]
//! 2. within a size, digest groups in the order the hashing phase created them
//! 3. within a group, files in arrival order
//!
//! Numbers start at 1 and run contiguously across every group.

use std::path::{Path, PathBuf};

use super::groups::{HashGroups, SortOrder};
use crate::scanner::{hash_to_hex, Hash};

/// A numbered duplicate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// 1-based selection number
    pub number: usize,
    /// Path to the file
    pub path: PathBuf,
    /// Size recorded at scan time
    pub size: u64,
    /// Content digest shared with the rest of its group
    pub hash: Hash,
}

/// Entries sharing one (size, digest) pair, in catalog order.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSection<'a> {
    /// Shared size in bytes
    pub size: u64,
    /// Shared digest
    pub hash: Hash,
    /// Entries of this group
    pub entries: &'a [CatalogEntry],
}

impl CatalogSection<'_> {
    /// Digest as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

/// Flattened, numbered list of duplicate files.
#[derive(Debug, Clone, Default)]
pub struct DuplicateCatalog {
    entries: Vec<CatalogEntry>,
    order: SortOrder,
}

impl DuplicateCatalog {
    /// Number the duplicate groups in catalog order.
    ///
    /// # Example
    ///
    /// ```
    /// use dupsweep::duplicates::{DuplicateCatalog, HashGroups, SortOrder};
    ///
    /// let catalog = DuplicateCatalog::build(&HashGroups::default(), SortOrder::Ascending);
    /// assert!(catalog.is_empty());
    /// ```
    #[must_use]
    pub fn build(groups: &HashGroups, order: SortOrder) -> Self {
        let entries = groups
            .iter(order)
            .flat_map(|(_, groups)| groups.iter())
            .flat_map(|group| {
                group
                    .files
                    .iter()
                    .map(move |file| (group.hash, group.size, file.path.clone()))
            })
            .enumerate()
            .map(|(index, (hash, size, path))| CatalogEntry {
                number: index + 1,
                path,
                size,
                hash,
            })
            .collect::<Vec<_>>();

        log::debug!("Catalog built with {} entries ({} order)", entries.len(), order);
        Self { entries, order }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sort order the catalog was built with.
    #[must_use]
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// All entries in number order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an entry by its 1-based number.
    #[must_use]
    pub fn get(&self, number: usize) -> Option<&CatalogEntry> {
        number
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
    }

    /// Path of the entry with the given number.
    #[must_use]
    pub fn path(&self, number: usize) -> Option<&Path> {
        self.get(number).map(|e| e.path.as_path())
    }

    /// Entries split into their (size, digest) groups, in catalog order.
    pub fn sections(&self) -> impl Iterator<Item = CatalogSection<'_>> {
        self.entries
            .chunk_by(|a, b| a.size == b.size && a.hash == b.hash)
            .map(|entries| CatalogSection {
                size: entries[0].size,
                hash: entries[0].hash,
                entries,
            })
    }
}
