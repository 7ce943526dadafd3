//! Core type system and error handling for replisync
//!
//! This crate provides the foundational types, error handling, and shared data
//! structures used throughout the replisync workspace. It includes:
//!
//! - **Error handling**: Structured error types with severity levels and a
//!   recoverable/fatal split matching the pass model
//! - **Core types**: Path entries, sync actions, and per-pass statistics
//!
//! # Features
//!
//! - `std` (default): Enable standard library features
//! - `serde`: Enable serialization support
//!
//! # Examples
//!
//! ```rust
//! use replisync_types::{Result, SyncAction, SyncStats};
//! use std::path::PathBuf;
//!
//! fn example_pass() -> Result<SyncStats> {
//!     let action = SyncAction::CopyFile { path: PathBuf::from("a/b.txt") };
//!     assert_eq!(action.to_string(), "COPY_FILE a/b.txt");
//!
//!     let mut stats = SyncStats::new();
//!     stats.files_copied = 1;
//!     Ok(stats)
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod result;
pub mod types;

// Re-export commonly used types
pub use error::{Error, ErrorKind, ErrorSeverity};
pub use result::Result;
pub use types::*;
