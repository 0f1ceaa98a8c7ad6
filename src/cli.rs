//! Command-line interface definitions for dupsweep.
//!
//! Every option that also exists in the config file is optional here so that
//! an absent flag never overrides a configured value. Options left unset after
//! configuration (extension, sort order) are asked for interactively.
//!
//! # Example
//!
//! ```bash
//! # Fully interactive
//! dupsweep ~/Downloads
//!
//! # No prompts for filter and order
//! dupsweep ~/Downloads --ext .jpg --sort ascending
//!
//! # Move deleted files to the trash and keep going past failures
//! dupsweep ~/Downloads --trash --keep-going
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::duplicates::SortOrder;

/// Find byte-identical files and delete the copies you pick.
///
/// Files are bucketed by size, then by BLAKE3 content hash. Confirmed
/// duplicates are listed with numbers; enter the numbers to delete.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for duplicates
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Only consider files whose extension ends with EXT (e.g. .txt)
    ///
    /// Case-sensitive. When absent, the extension is asked for; an empty
    /// answer accepts every file.
    #[arg(short, long = "ext", value_name = "EXT")]
    pub extension: Option<String>,

    /// Size order for listings. When absent, the order is asked for.
    #[arg(short, long, value_enum, value_name = "ORDER")]
    pub sort: Option<SortOrder>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress everything on stderr except errors, including the progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Configuration file (default: config.toml in the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of threads used for hashing (default: 4)
    #[arg(long, value_name = "N", value_parser = parse_thread_count)]
    pub io_threads: Option<usize>,

    /// Rename scanned files to lowercase file names
    ///
    /// Never overwrites an existing file of the lowercase name.
    #[arg(long)]
    pub lowercase_names: bool,

    /// Report failed deletions and continue with the rest of the selection
    #[arg(long)]
    pub keep_going: bool,

    /// Move files to the system trash instead of deleting them
    #[arg(long)]
    pub trash: bool,

    /// Print errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Parse a thread count of at least one.
///
/// ```
/// use dupsweep::cli::parse_thread_count;
///
/// assert_eq!(parse_thread_count("8"), Ok(8));
/// assert!(parse_thread_count("0").is_err());
/// ```
///
/// # Errors
///
/// Returns a message for non-numeric input or zero.
pub fn parse_thread_count(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid thread count: '{s}'"))?;
    if n == 0 {
        return Err("Thread count must be at least 1".to_string());
    }
    Ok(n)
}
