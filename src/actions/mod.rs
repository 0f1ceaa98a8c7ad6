//! File actions module.
//!
//! This module provides functionality for:
//! - Parsing the operator's selection of catalog numbers
//! - Deleting the selected files, permanently or via the system trash
//!
//! ```no_run
//! use dupsweep::actions::{delete_selection, parse_selection, DeleteConfig};
//! use dupsweep::duplicates::DuplicateCatalog;
//!
//! # fn demo(catalog: &DuplicateCatalog) -> Result<(), Box<dyn std::error::Error>> {
//! let selection = parse_selection("1 3", catalog.len())?;
//! let report = delete_selection(catalog, &selection, &DeleteConfig::default())?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

pub mod delete;
pub mod selection;

pub use delete::{
    delete_selection, delete_to_trash, permanent_delete, DeleteConfig, DeleteError, DeleteMethod,
    DeleteResult, DeletionReport,
};
pub use selection::{parse_selection, Selection, SelectionError};
