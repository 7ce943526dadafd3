//! Core data types for replisync
//!
//! This module provides the fundamental data types shared across the
//! replisync crates: tree positions, the actions a reconciliation pass can
//! take, and per-pass statistics.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Kind of filesystem entry a mirror pass works with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// A position in a source or destination tree
///
/// The path is always relative to the respective tree root, so the same
/// `PathEntry` identifies corresponding entries on both sides.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathEntry {
    /// Path relative to the tree root
    pub path: PathBuf,
    /// Entry kind
    pub kind: EntryKind,
}

impl PathEntry {
    /// Create a new path entry
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Create a file entry
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, EntryKind::File)
    }

    /// Create a directory entry
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, EntryKind::Directory)
    }
}

/// A single mutation applied to the destination tree
///
/// Actions carry the relative path they apply to. They are constructed during
/// one reconciliation pass and discarded after being applied and reported;
/// nothing is retained across passes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SyncAction {
    /// Create a directory missing from the destination
    CreateDir {
        /// Relative path of the directory
        path: PathBuf,
    },
    /// Copy a file, overwriting the destination contents in full
    CopyFile {
        /// Relative path of the file
        path: PathBuf,
    },
    /// Delete a destination file absent from the source
    DeleteFile {
        /// Relative path of the file
        path: PathBuf,
    },
    /// Delete a destination directory absent from the source
    DeleteDir {
        /// Relative path of the directory
        path: PathBuf,
    },
}

impl SyncAction {
    /// The relative path this action applies to
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateDir { path }
            | Self::CopyFile { path }
            | Self::DeleteFile { path }
            | Self::DeleteDir { path } => path,
        }
    }

    /// Short uppercase tag used in log lines
    pub fn tag(&self) -> &'static str {
        match self {
            Self::CreateDir { .. } => "CREATE_DIR",
            Self::CopyFile { .. } => "COPY_FILE",
            Self::DeleteFile { .. } => "DELETE_FILE",
            Self::DeleteDir { .. } => "DELETE_DIR",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tag(), self.path().display())
    }
}

/// Statistics for one reconciliation pass
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyncStats {
    /// Number of directories created
    pub dirs_created: u64,
    /// Number of files copied (created or updated)
    pub files_copied: u64,
    /// Number of files deleted from the destination
    pub files_deleted: u64,
    /// Number of directories deleted from the destination
    pub dirs_deleted: u64,
    /// Number of files whose digests matched, requiring no copy
    pub files_unchanged: u64,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Number of errors encountered
    pub errors: u64,
    /// Total duration of the pass
    pub duration: Duration,
}

impl SyncStats {
    /// Create a new empty statistics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of actions applied during the pass
    pub fn total_actions(&self) -> u64 {
        self.dirs_created + self.files_copied + self.files_deleted + self.dirs_deleted
    }

    /// Whether the pass changed nothing and hit no errors
    pub fn is_clean_noop(&self) -> bool {
        self.total_actions() == 0 && self.errors == 0
    }

    /// Merge statistics from another instance
    pub fn merge(&mut self, other: &SyncStats) {
        self.dirs_created += other.dirs_created;
        self.files_copied += other.files_copied;
        self.files_deleted += other.files_deleted;
        self.dirs_deleted += other.dirs_deleted;
        self.files_unchanged += other.files_unchanged;
        self.bytes_copied += other.bytes_copied;
        self.errors += other.errors;
        self.duration += other.duration;
    }
}
