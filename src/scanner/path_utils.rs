//! Path identity helpers.
//!
//! A [`FileRecord`](super::FileRecord) is identified by a comparison key rather
//! than by its raw bytes. The key is the NFC-normalized path, additionally
//! case-folded on platforms whose filesystems are case-insensitive by default.
//!
//! # Background
//!
//! macOS uses NFD (Decomposed) normalization for file paths, while Windows
//! and Linux typically use NFC (Composed) normalization. The same visual
//! filename can therefore have different byte representations:
//!
//! - NFC: `café.txt` - 'é' is U+00E9 (single code point)
//! - NFD: `café.txt` - 'e' U+0065 + combining acute accent U+0301
//!
//! # Example
//!
//! ```
//! use dupsweep::scanner::path_utils::{normalize_path_str, path_key};
//! use std::path::Path;
//!
//! let nfc = "café.txt";
//! let nfd = "cafe\u{0301}.txt";
//!
//! assert_eq!(normalize_path_str(nfc), normalize_path_str(nfd));
//! assert_eq!(path_key(Path::new(nfc)), path_key(Path::new(nfd)));
//! ```

use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Whether the host's default filesystems compare names case-insensitively.
pub const CASE_INSENSITIVE_FS: bool = cfg!(any(windows, target_os = "macos"));

/// Normalize a path string to NFC (Composed) form.
///
/// # Example
///
/// ```
/// use dupsweep::scanner::path_utils::normalize_path_str;
///
/// let nfd = "cafe\u{0301}.txt";
/// assert_eq!(normalize_path_str(nfd), "café.txt");
/// ```
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    s.nfc().collect()
}

/// Create the identity key for a path.
///
/// The key is NFC-normalized and, on case-insensitive platforms, lowercased.
/// Paths with invalid UTF-8 use their lossy conversion.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use std::path::Path;
/// use dupsweep::scanner::path_utils::path_key;
///
/// let mut seen = HashSet::new();
/// seen.insert(path_key(Path::new("café.txt")));
///
/// assert!(seen.contains(&path_key(Path::new("cafe\u{0301}.txt"))));
/// ```
#[must_use]
pub fn path_key(path: &Path) -> String {
    let normalized = normalize_path_str(&path.to_string_lossy());
    if CASE_INSENSITIVE_FS {
        normalized.to_lowercase()
    } else {
        normalized
    }
}

/// Compute the path a file would have after lowercasing its file name.
///
/// Only the final component changes; parent directories keep their casing.
/// Returns `None` when the name is already lowercase or is not valid UTF-8.
///
/// # Example
///
/// ```
/// use std::path::{Path, PathBuf};
/// use dupsweep::scanner::path_utils::lowercased_file_name;
///
/// assert_eq!(
///     lowercased_file_name(Path::new("/Photos/IMG_01.JPG")),
///     Some(PathBuf::from("/Photos/img_01.jpg"))
/// );
/// assert_eq!(lowercased_file_name(Path::new("/Photos/done.jpg")), None);
/// ```
#[must_use]
pub fn lowercased_file_name(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let lower = name.to_lowercase();
    if lower == name {
        None
    } else {
        Some(path.with_file_name(lower))
    }
}
