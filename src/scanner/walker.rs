//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and collecting a [`FileRecord`] for every accepted file. Traversal is
//! single-threaded and deterministic: children are visited in file-name order,
//! so two walks over an unchanged tree yield the same sequence.
//!
//! # Error policy
//!
//! Unlike hashing, the walk has no partial-failure tolerance. Any traversal
//! error, or a file vanishing between discovery and its size query, ends the
//! collection with a [`ScanError`].
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files = walker.collect().expect("walk failed");
//! println!("Found {} files", files.len());
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::path_utils::{lowercased_file_name, CASE_INSENSITIVE_FS};
use super::{FileRecord, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for cancellation
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag.
    ///
    /// When the flag is set to `true`, [`collect`](Self::collect) stops at the
    /// next entry and returns [`ScanError::Interrupted`].
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the tree and collect every accepted file in walk order.
    ///
    /// # Errors
    ///
    /// - [`ScanError::NotFound`] / [`ScanError::NotADirectory`] for a bad root
    /// - [`ScanError::Interrupted`] if the shutdown flag was raised
    /// - Any traversal or metadata failure, classified by [`ScanError`]
    pub fn collect(&self) -> Result<Vec<FileRecord>, ScanError> {
        self.validate_root()?;

        let mut records = Vec::new();
        let mut seen = HashSet::new();

        let walk = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        for entry in walk {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return Err(ScanError::Interrupted);
            }

            let entry = entry.map_err(|e| self.handle_walk_error(e))?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                continue;
            }
            if file_type.is_symlink() && !self.config.follow_symlinks {
                log::trace!("Skipping symlink: {}", entry.path().display());
                continue;
            }
            if !self.config.accepts(entry.path()) {
                log::trace!("Skipping file due to extension filter: {}", entry.path().display());
                continue;
            }

            let Some(record) = self.process_file(entry.into_path())? else {
                continue;
            };
            if !seen.insert(record.key()) {
                log::debug!("Skipping already recorded path: {}", record.path.display());
                continue;
            }
            records.push(record);
        }

        log::info!(
            "Collected {} file(s) under {}",
            records.len(),
            self.root.display()
        );
        Ok(records)
    }

    fn validate_root(&self) -> Result<(), ScanError> {
        let metadata = fs::metadata(&self.root).map_err(|e| ScanError::from_io(&self.root, e))?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(ScanError::NotADirectory(self.root.clone()))
        }
    }

    /// Query the size of an accepted file and apply the optional rename.
    ///
    /// Returns `None` for anything that is not a regular file (FIFOs,
    /// sockets, device nodes).
    fn process_file(&self, path: PathBuf) -> Result<Option<FileRecord>, ScanError> {
        let metadata = fs::metadata(&path).map_err(|e| {
            log::warn!("Failed to stat {}: {}", path.display(), e);
            ScanError::from_io(&path, e)
        })?;
        if !metadata.is_file() {
            log::trace!("Skipping non-regular file: {}", path.display());
            return Ok(None);
        }
        let size = metadata.len();

        let path = if self.config.lowercase_names {
            self.rename_lowercase(path)?
        } else {
            path
        };

        log::trace!("Recorded {} ({} bytes)", path.display(), size);
        Ok(Some(FileRecord::new(path, size)))
    }

    /// Rename a file to its lowercase file name, returning the path now in use.
    ///
    /// An existing file under the target name is never overwritten.
    fn rename_lowercase(&self, path: PathBuf) -> Result<PathBuf, ScanError> {
        let Some(target) = lowercased_file_name(&path) else {
            return Ok(path);
        };

        if !CASE_INSENSITIVE_FS && target.exists() {
            log::warn!(
                "Not renaming {}: {} already exists",
                path.display(),
                target.display()
            );
            return Ok(path);
        }

        fs::rename(&path, &target).map_err(|e| ScanError::from_io(&path, e))?;
        log::debug!("Renamed {} -> {}", path.display(), target.display());
        Ok(target)
    }

    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        log::warn!("Walker error for {}: {}", path.display(), error);

        match error.into_io_error() {
            Some(io) => ScanError::from_io(&path, io),
            None => ScanError::Io {
                path,
                source: std::io::Error::other("filesystem loop detected"),
            },
        }
    }
}
