//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (phase 1)
//! - Full content hash comparison (phase 2)
//! - The numbered duplicate catalog shown to the operator

pub mod catalog;
pub mod finder;
pub mod groups;

pub use catalog::{CatalogEntry, CatalogSection, DuplicateCatalog};
pub use finder::{group_by_hash, HashConfig, HashStats};
pub use groups::{
    group_by_size, DuplicateGroup, GroupingStats, HashGroups, SizeGroups, SortOrder,
};
