//! dupsweep - interactive duplicate file remover
//!
//! Finds byte-identical files under a directory by bucketing them on size and
//! then on BLAKE3 content hash, lists the confirmed duplicates with numbers,
//! and deletes the ones the operator picks while reporting the space freed.
//!
//! The pipeline runs strictly forward:
//!
//! ```text
//! scanner::Walker -> duplicates::group_by_size -> duplicates::group_by_hash
//!     -> duplicates::DuplicateCatalog -> actions::{parse_selection, delete_selection}
//! ```
//!
//! [`session::ScanSession`] holds the state of one run and exposes the
//! stages as `scan`, `group` and `select_and_delete`.

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod session;
pub mod signal;

pub use app::run_app;
