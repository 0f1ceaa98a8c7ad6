//! Content-hash grouping of same-size files.
//!
//! # Overview
//!
//! This is the second filter of duplicate detection. Every file that survived
//! size grouping is hashed in full and sub-bucketed by digest; digest buckets
//! holding a single file are dropped.
//!
//! Hashing fans out across a bounded rayon pool, but results are collected in
//! input order before grouping, so the outcome is identical to a sequential
//! pass: digest groups appear in the order their first member arrived and
//! members keep their arrival order. Each file is hashed exactly once.
//!
//! A file that cannot be read is logged, counted in [`HashStats`] and left out
//! of every group. It never cancels the other files.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{Walker, WalkerConfig, Hasher};
//! use dupsweep::duplicates::{group_by_size, group_by_hash, HashConfig};
//! use std::path::Path;
//!
//! let files = Walker::new(Path::new("."), WalkerConfig::default()).collect().unwrap();
//! let (size_groups, _) = group_by_size(files);
//!
//! let (hash_groups, stats) = group_by_hash(size_groups, &Hasher::new(), &HashConfig::default());
//! println!("{} duplicate groups, {} unreadable files", hash_groups.group_count(), stats.failed_files);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::groups::{DuplicateGroup, HashGroups, SizeGroups};
use crate::progress::ProgressCallback;
use crate::scanner::{FileRecord, Hash, HashError, Hasher};

/// Name reported to progress callbacks for this phase.
pub const HASH_PHASE: &str = "hashing";

/// Configuration for the hashing phase.
#[derive(Clone)]
pub struct HashConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Optional shutdown flag for cancellation.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for HashConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashConfig")
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl HashConfig {
    /// Set the I/O thread count (at least one).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the shutdown flag.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Statistics from the hashing phase.
#[derive(Debug, Default)]
pub struct HashStats {
    /// Number of files handed to the phase
    pub input_files: usize,
    /// Number of files hashed successfully
    pub hashed_files: usize,
    /// Number of files that could not be read
    pub failed_files: usize,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Number of files in confirmed duplicate groups
    pub duplicate_files: usize,
    /// Space reclaimable by keeping one copy per group
    pub wasted_space: u64,
    /// Whether the phase stopped early on a shutdown request
    pub interrupted: bool,
    /// Per-file failures, in input order
    pub errors: Vec<HashError>,
}

/// Outcome of hashing one file.
enum HashOutcome {
    Hashed(u64, FileRecord, Hash),
    Failed(HashError),
    Skipped,
}

/// Group same-size files by content digest.
///
/// Consumes the size groups and returns the confirmed duplicate groups
/// together with phase statistics. Sizes whose files all turn out distinct
/// disappear from the result.
#[must_use]
pub fn group_by_hash(
    size_groups: SizeGroups,
    hasher: &Hasher,
    config: &HashConfig,
) -> (HashGroups, HashStats) {
    let jobs: Vec<(u64, FileRecord)> = size_groups
        .into_buckets()
        .flat_map(|(size, files)| files.into_iter().map(move |f| (size, f)))
        .collect();

    let mut stats = HashStats {
        input_files: jobs.len(),
        ..Default::default()
    };

    if jobs.is_empty() {
        log::debug!("Hashing: No files to process");
        return (HashGroups::default(), stats);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start(HASH_PHASE, jobs.len());
    }
    log::info!("Hashing {} candidate files", jobs.len());

    let outcomes = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.io_threads)
        .build()
    {
        Ok(pool) => pool.install(|| hash_all(jobs, hasher, config)),
        Err(e) => {
            log::warn!(
                "Failed to create hashing thread pool ({}), using global pool with {} threads",
                e,
                rayon::current_num_threads()
            );
            hash_all(jobs, hasher, config)
        }
    };

    // Stable grouping: digest groups in first-arrival order per size.
    let mut buckets: BTreeMap<u64, Vec<(Hash, Vec<FileRecord>)>> = BTreeMap::new();
    let mut index: HashMap<(u64, Hash), usize> = HashMap::new();

    for outcome in outcomes {
        match outcome {
            HashOutcome::Hashed(size, file, hash) => {
                stats.hashed_files += 1;
                stats.bytes_hashed += file.size;
                let groups = buckets.entry(size).or_default();
                let slot = *index.entry((size, hash)).or_insert_with(|| {
                    groups.push((hash, Vec::new()));
                    groups.len() - 1
                });
                groups[slot].1.push(file);
            }
            HashOutcome::Failed(e) => {
                stats.failed_files += 1;
                stats.errors.push(e);
            }
            HashOutcome::Skipped => stats.interrupted = true,
        }
    }

    if stats.interrupted {
        log::info!("Hashing: Interrupted by shutdown signal");
    }

    let hash_groups = HashGroups::from_buckets(buckets.into_iter().map(|(size, groups)| {
        let groups = groups
            .into_iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(hash, files)| {
                log::debug!(
                    "Duplicate group {}: {} files, {} bytes each",
                    crate::scanner::hash_to_hex(&hash),
                    files.len(),
                    size
                );
                DuplicateGroup::new(hash, size, files)
            })
            .collect();
        (size, groups)
    }));

    stats.duplicate_groups = hash_groups.group_count();
    stats.duplicate_files = hash_groups.file_count();
    stats.wasted_space = hash_groups.wasted_space();

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end(HASH_PHASE);
    }

    log::info!(
        "Hashing complete: {} groups, {} files, {} bytes reclaimable, {} unreadable",
        stats.duplicate_groups,
        stats.duplicate_files,
        stats.wasted_space,
        stats.failed_files
    );

    (hash_groups, stats)
}

/// Hash every job, returning outcomes in job order.
fn hash_all(jobs: Vec<(u64, FileRecord)>, hasher: &Hasher, config: &HashConfig) -> Vec<HashOutcome> {
    let completed = AtomicUsize::new(0);

    jobs.into_par_iter()
        .map(|(size, file)| {
            if config.is_shutdown_requested() {
                return HashOutcome::Skipped;
            }

            let outcome = match hasher.full_hash(&file.path) {
                Ok(hash) => {
                    log::trace!("Hash computed: {}", file.path.display());
                    if let Some(ref callback) = config.progress_callback {
                        callback.on_item_completed(file.size);
                    }
                    HashOutcome::Hashed(size, file, hash)
                }
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", file.path.display(), e);
                    HashOutcome::Failed(e)
                }
            };

            if let Some(ref callback) = config.progress_callback {
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                let path = match &outcome {
                    HashOutcome::Hashed(_, f, _) => f.path.to_string_lossy().into_owned(),
                    HashOutcome::Failed(e) => e.path().to_string_lossy().into_owned(),
                    HashOutcome::Skipped => String::new(),
                };
                callback.on_progress(done, &path);
            }

            outcome
        })
        .collect()
}
