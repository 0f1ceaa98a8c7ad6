//! Exit codes and structured error output.

use serde::Serialize;

use crate::config::ConfigError;
use crate::session::SessionError;

/// Process exit codes.
///
/// - 0: Success (including runs without duplicates and declined prompts)
/// - 1: General error
/// - 2: No directory given
/// - 3: Partial success (unreadable files or failed deletions were skipped)
/// - 130: Interrupted by Ctrl+C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Run completed.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// The directory argument was missing.
    MissingDirectory = 2,
    /// Run completed but some files were skipped or could not be deleted.
    PartialSuccess = 3,
    /// Run was interrupted by the user.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::MissingDirectory => "DS002",
            Self::PartialSuccess => "DS003",
            Self::Interrupted => "DS130",
        }
    }

    /// Classify an error escaping the front end.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        if let Some(SessionError::Interrupted) = err.downcast_ref::<SessionError>() {
            return Self::Interrupted;
        }
        if let Some(ConfigError::MissingDirectory) = err.downcast_ref::<ConfigError>() {
            return Self::MissingDirectory;
        }
        Self::GeneralError
    }
}

/// Structured error information for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
