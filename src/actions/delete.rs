//! File deletion for selected catalog entries.
//!
//! # Overview
//!
//! Files are removed one by one, in ascending catalog number order:
//! - Permanent removal (default)
//! - Move to system trash via the `trash` crate (`--trash`)
//!
//! Each file's size is queried immediately before it is removed, so the freed
//! total reflects what was on disk at deletion time rather than at scan time.
//!
//! # Failure policy
//!
//! By default the first failure aborts the batch with a [`DeleteError`].
//! Files already removed stay removed. With
//! [`DeleteConfig::continue_on_error`] every failure is recorded in the
//! [`DeletionReport`] and the remaining files are still processed.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::delete::permanent_delete;
//! use std::path::Path;
//!
//! match permanent_delete(Path::new("/path/to/duplicate.txt")) {
//!     Ok(result) => println!("Deleted: {} ({} bytes)", result.path.display(), result.size),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::selection::Selection;
use crate::duplicates::DuplicateCatalog;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved since the scan).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("permanent delete failed for {path}: {message}")]
    PermanentDeleteFailed { path: PathBuf, message: String },

    /// Selected number has no catalog entry.
    #[error("no catalog entry numbered {0}")]
    UnknownEntry(usize),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::PermanentDeleteFailed { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            Self::UnknownEntry(_) => None,
        }
    }

    fn from_metadata(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// How selected files are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMethod {
    /// Remove the file from disk.
    #[default]
    Permanent,
    /// Move the file to the platform trash.
    Trash,
}

impl std::fmt::Display for DeleteMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permanent => write!(f, "permanent"),
            Self::Trash => write!(f, "trash"),
        }
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Catalog number of the deleted file (0 when deleted outside a catalog).
    pub number: usize,
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size measured immediately before deletion.
    pub size: u64,
    /// Whether deletion was permanent (true) or to trash (false).
    pub permanent: bool,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, permanent: bool) -> Self {
        Self {
            number: 0,
            path,
            size,
            permanent,
        }
    }

    #[must_use]
    fn numbered(mut self, number: usize) -> Self {
        self.number = number;
        self
    }
}

/// Outcome of deleting a selection.
#[derive(Debug, Default)]
pub struct DeletionReport {
    /// Successfully deleted files, in the order they were removed.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions (only populated with `continue_on_error`).
    pub failures: Vec<(usize, DeleteError)>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl DeletionReport {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Deleted {} file(s), freed {} bytes",
                self.success_count(),
                self.bytes_freed
            )
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {} bytes",
                self.success_count(),
                self.failure_count(),
                self.bytes_freed
            )
        }
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteConfig {
    /// Removal method.
    pub method: DeleteMethod,
    /// Keep going after a failed deletion, recording it in the report.
    pub continue_on_error: bool,
}

impl DeleteConfig {
    /// Set the removal method.
    #[must_use]
    pub fn with_method(mut self, method: DeleteMethod) -> Self {
        self.method = method;
        self
    }

    /// Enable/disable continue on error.
    #[must_use]
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    fn delete(&self, path: &Path) -> Result<DeleteResult, DeleteError> {
        match self.method {
            DeleteMethod::Permanent => permanent_delete(path),
            DeleteMethod::Trash => delete_to_trash(path),
        }
    }
}

fn current_size(path: &Path) -> Result<u64, DeleteError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| DeleteError::from_metadata(path, e))
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata can't be read
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = current_size(path)?;

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult::new(path.to_path_buf(), size, false))
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata can't be read
/// - `PermanentDeleteFailed` if the delete operation fails
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = current_size(path)?;

    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        DeleteError::PermanentDeleteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult::new(path.to_path_buf(), size, true))
}

/// Delete every file named by `selection`.
///
/// Numbers are processed in ascending order. The selection is expected to
/// have been validated against this catalog by
/// [`parse_selection`](super::selection::parse_selection).
///
/// # Errors
///
/// Without `continue_on_error`, returns the first [`DeleteError`]. Files
/// deleted before the failure are not restored.
pub fn delete_selection(
    catalog: &DuplicateCatalog,
    selection: &Selection,
    config: &DeleteConfig,
) -> Result<DeletionReport, DeleteError> {
    let mut report = DeletionReport::default();

    for number in selection.iter() {
        let outcome = catalog
            .path(number)
            .ok_or(DeleteError::UnknownEntry(number))
            .and_then(|path| config.delete(path));

        match outcome {
            Ok(deleted) => {
                report.bytes_freed += deleted.size;
                report.successes.push(deleted.numbered(number));
            }
            Err(e) if config.continue_on_error => {
                log::warn!("Failed to delete entry {}: {}", number, e);
                report.failures.push((number, e));
            }
            Err(e) => return Err(e),
        }
    }

    log::info!("{}", report.summary());
    Ok(report)
}
