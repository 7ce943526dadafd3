//! Error types and handling for replisync
//!
//! This module provides the structured error taxonomy for mirroring
//! operations: per-entry I/O failures that a pass recovers from, pass-level
//! failures that the next scheduled pass retries, and configuration errors
//! that are fatal before any synchronization is attempted.

use std::path::PathBuf;

// Serde is imported conditionally through cfg_attr

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Low severity - the entry is skipped and the pass continues
    Low,
    /// Medium severity - the pass continues or retries on the next interval
    Medium,
    /// High severity - the operation should be aborted
    High,
    /// Critical severity - the entire process should be terminated
    Critical,
}

/// Main error type for replisync operations
#[derive(thiserror::Error, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found
        path: PathBuf,
    },

    /// Permission denied
    #[error("Permission denied: {path}")]
    PermissionDenied {
        /// Path to the file with permission issues
        path: PathBuf,
    },

    /// Source root missing or not a directory at the start of a pass
    #[error("Source directory unavailable: {path}")]
    SourceMissing {
        /// Configured source root
        path: PathBuf,
    },

    /// Entry type that mirroring does not support (symlink, socket, device)
    #[error("Unsupported entry type: {path}")]
    UnsupportedEntry {
        /// Path to the offending entry
        path: PathBuf,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// I/O related errors
    Io,
    /// Source root unavailable for a pass
    SourceMissing,
    /// Unsupported entry types
    UnsupportedEntry,
    /// Configuration errors
    Config,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } | Self::FileNotFound { .. } | Self::PermissionDenied { .. } => {
                ErrorKind::Io
            }
            Self::SourceMissing { .. } => ErrorKind::SourceMissing,
            Self::UnsupportedEntry { .. } => ErrorKind::UnsupportedEntry,
            Self::Config { .. } => ErrorKind::Config,
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Io { .. } | Self::FileNotFound { .. } | Self::PermissionDenied { .. } => {
                ErrorSeverity::Medium
            }
            Self::SourceMissing { .. } => ErrorSeverity::Medium,
            Self::UnsupportedEntry { .. } => ErrorSeverity::Low,
            Self::Config { .. } => ErrorSeverity::High,
            Self::Other { .. } => ErrorSeverity::Medium,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors never abort a pass (per-entry failures) or the
    /// process (pass-level failures retried on the next interval).
    /// Configuration errors are not recoverable: they are reported before any
    /// synchronization is attempted.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io { .. } | Self::FileNotFound { .. } | Self::PermissionDenied { .. } => true,
            Self::SourceMissing { .. } | Self::UnsupportedEntry { .. } => true,
            Self::Config { .. } => false,
            Self::Other { .. } => true,
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Wrap a `std::io::Error` for an operation on a concrete path
    ///
    /// `NotFound` and `PermissionDenied` keep their own variants so that
    /// callers and tests can match on them; everything else collapses into
    /// [`Error::Io`] with the path in the message.
    pub fn from_io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io {
                message: format!("{}: {}", path.display(), error),
            },
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
