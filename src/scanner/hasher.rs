//! BLAKE3 whole-file hasher.
//!
//! # Overview
//!
//! The digest is used purely to detect identical content among files that
//! already share a size. It is a change-detection hash: no part of the
//! pipeline relies on it for security. Each file is read into memory once
//! and hashed in a single pass.

use std::fs;
use std::io;
use std::path::Path;

use super::HashError;

/// A 32-byte BLAKE3 digest.
pub type Hash = [u8; 32];

/// Whole-file content hasher.
#[derive(Debug, Clone, Default)]
pub struct Hasher;

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash the entire content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be read.
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        let content = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
            _ => HashError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        Ok(*blake3::hash(&content).as_bytes())
    }
}

/// Render a digest as lowercase hex.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    blake3::Hash::from(*hash).to_hex().to_string()
}
