//! Run state for one scan.
//!
//! A [`ScanSession`] owns everything produced during a run and exposes the
//! three core operations in pipeline order:
//!
//! 1. [`scan`](ScanSession::scan) walks the tree and buckets files by size
//! 2. [`group`](ScanSession::group) hashes candidates and numbers the duplicates
//! 3. [`select_and_delete`](ScanSession::select_and_delete) validates a
//!    selection against the catalog and removes the files
//!
//! Nothing is shared between sessions and nothing outlives the run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::actions::{
    delete_selection, parse_selection, DeleteConfig, DeleteError, DeletionReport, Selection,
    SelectionError,
};
use crate::duplicates::{
    group_by_hash, group_by_size, DuplicateCatalog, GroupingStats, HashConfig, HashGroups,
    HashStats, SizeGroups, SortOrder,
};
use crate::scanner::{Hasher, ScanError, Walker, WalkerConfig};

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The directory walk failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The selection text was rejected.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// A selected file could not be deleted.
    #[error(transparent)]
    Delete(#[from] DeleteError),

    /// A shutdown was requested between or during stages.
    #[error("operation interrupted")]
    Interrupted,

    /// An operation was called before the stage it depends on.
    #[error("{0} requires a completed {1} stage")]
    StageOrder(&'static str, &'static str),
}

/// Everything a session needs to run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory to scan
    pub root: PathBuf,
    /// Walk options
    pub walker: WalkerConfig,
    /// Order applied to every size-ordered listing
    pub sort_order: SortOrder,
    /// Hashing options
    pub hash: HashConfig,
    /// Deletion options
    pub delete: DeleteConfig,
}

impl SessionConfig {
    /// Config with defaults for everything but the root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            walker: WalkerConfig::default(),
            sort_order: SortOrder::default(),
            hash: HashConfig::default(),
            delete: DeleteConfig::default(),
        }
    }

    #[must_use]
    pub fn with_walker(mut self, walker: WalkerConfig) -> Self {
        self.walker = walker;
        self
    }

    #[must_use]
    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    #[must_use]
    pub fn with_hash(mut self, hash: HashConfig) -> Self {
        self.hash = hash;
        self
    }

    #[must_use]
    pub fn with_delete(mut self, delete: DeleteConfig) -> Self {
        self.delete = delete;
        self
    }
}

/// State of a single scan run.
#[derive(Debug)]
pub struct ScanSession {
    config: SessionConfig,
    shutdown_flag: Option<Arc<AtomicBool>>,
    hasher: Hasher,
    size_groups: Option<SizeGroups>,
    grouping_stats: Option<GroupingStats>,
    hash_groups: Option<HashGroups>,
    hash_stats: Option<HashStats>,
    catalog: Option<DuplicateCatalog>,
}

impl ScanSession {
    /// Create a session that has not scanned anything yet.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            shutdown_flag: None,
            hasher: Hasher::new(),
            size_groups: None,
            grouping_stats: None,
            hash_groups: None,
            hash_stats: None,
            catalog: None,
        }
    }

    /// Share a shutdown flag with the walker and hashing stage.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.config.hash = self.config.hash.with_shutdown_flag(Arc::clone(&flag));
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn check_shutdown(&self) -> Result<(), SessionError> {
        if self.is_shutdown_requested() {
            log::debug!("Session: shutdown requested at stage boundary");
            return Err(SessionError::Interrupted);
        }
        Ok(())
    }

    /// Root directory of this run.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Walk the tree and bucket the files by size.
    ///
    /// Running it again discards any earlier grouping and catalog.
    ///
    /// # Errors
    ///
    /// [`SessionError::Scan`] for any walk failure, or
    /// [`SessionError::Interrupted`] on shutdown.
    pub fn scan(&mut self) -> Result<&SizeGroups, SessionError> {
        self.check_shutdown()?;

        let mut walker = Walker::new(&self.config.root, self.config.walker.clone());
        if let Some(flag) = &self.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        let files = match walker.collect() {
            Ok(files) => files,
            Err(ScanError::Interrupted) => return Err(SessionError::Interrupted),
            Err(e) => return Err(e.into()),
        };

        let (groups, stats) = group_by_size(files);
        log::info!(
            "{} of {} files share a size with another file",
            stats.potential_duplicates,
            stats.total_files
        );

        self.hash_groups = None;
        self.hash_stats = None;
        self.catalog = None;
        self.grouping_stats = Some(stats);
        Ok(self.size_groups.insert(groups))
    }

    /// Hash the size-bucketed files and number the confirmed duplicates.
    ///
    /// # Errors
    ///
    /// [`SessionError::StageOrder`] before [`scan`](Self::scan), or
    /// [`SessionError::Interrupted`] on shutdown.
    pub fn group(&mut self) -> Result<&DuplicateCatalog, SessionError> {
        let size_groups = self
            .size_groups
            .clone()
            .ok_or(SessionError::StageOrder("group", "scan"))?;
        self.check_shutdown()?;

        let (hash_groups, stats) = group_by_hash(size_groups, &self.hasher, &self.config.hash);
        if stats.interrupted {
            return Err(SessionError::Interrupted);
        }
        if stats.failed_files > 0 {
            log::warn!(
                "{} file(s) could not be read and were left out",
                stats.failed_files
            );
        }

        let catalog = DuplicateCatalog::build(&hash_groups, self.config.sort_order);
        self.hash_groups = Some(hash_groups);
        self.hash_stats = Some(stats);
        Ok(self.catalog.insert(catalog))
    }

    /// Validate `input` against the catalog and delete the selected files.
    ///
    /// A rejected selection leaves every file untouched.
    ///
    /// # Errors
    ///
    /// [`SessionError::Selection`] for bad input, [`SessionError::Delete`]
    /// for a fatal deletion failure, [`SessionError::StageOrder`] before
    /// [`group`](Self::group).
    pub fn select_and_delete(&self, input: &str) -> Result<DeletionReport, SessionError> {
        let selection = self.parse_selection(input)?;
        self.delete(&selection)
    }

    /// Validate `input` without deleting anything.
    ///
    /// # Errors
    ///
    /// As for [`select_and_delete`](Self::select_and_delete), minus deletion.
    pub fn parse_selection(&self, input: &str) -> Result<Selection, SessionError> {
        let catalog = self
            .catalog
            .as_ref()
            .ok_or(SessionError::StageOrder("selection", "group"))?;
        Ok(parse_selection(input, catalog.len())?)
    }

    /// Delete an already validated selection.
    ///
    /// # Errors
    ///
    /// [`SessionError::Delete`] for a fatal deletion failure.
    pub fn delete(&self, selection: &Selection) -> Result<DeletionReport, SessionError> {
        let catalog = self
            .catalog
            .as_ref()
            .ok_or(SessionError::StageOrder("deletion", "group"))?;
        self.check_shutdown()?;
        Ok(delete_selection(catalog, selection, &self.config.delete)?)
    }

    /// Size buckets from the last scan.
    #[must_use]
    pub fn size_groups(&self) -> Option<&SizeGroups> {
        self.size_groups.as_ref()
    }

    /// Statistics from the last scan.
    #[must_use]
    pub fn grouping_stats(&self) -> Option<&GroupingStats> {
        self.grouping_stats.as_ref()
    }

    /// Confirmed duplicate groups.
    #[must_use]
    pub fn hash_groups(&self) -> Option<&HashGroups> {
        self.hash_groups.as_ref()
    }

    /// Statistics from the hashing stage.
    #[must_use]
    pub fn hash_stats(&self) -> Option<&HashStats> {
        self.hash_stats.as_ref()
    }

    /// Numbered duplicate catalog.
    #[must_use]
    pub fn catalog(&self) -> Option<&DuplicateCatalog> {
        self.catalog.as_ref()
    }
}
