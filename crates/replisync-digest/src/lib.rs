//! Content digest computation and file equality decisions for replisync
//!
//! This crate is the content comparator of the replisync workspace. It
//! answers exactly one question: do a source file and a destination file hold
//! identical bytes? Equality is decided by a streaming BLAKE3 digest of the
//! full contents; file size may act as a cheap pre-filter, modification times
//! are never consulted.
//!
//! # Examples
//!
//! ```rust,no_run
//! use replisync_digest::{Comparison, FileComparator};
//!
//! # async fn example() -> replisync_types::Result<()> {
//! let comparator = FileComparator::default();
//! match comparator.compare("src/a.txt", "dst/a.txt").await? {
//!     Comparison::Same => println!("no copy needed"),
//!     Comparison::Different => println!("copy required"),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod compare;
pub mod hash;

pub use compare::{CompareConfig, Comparison, FileComparator};
pub use hash::file_digest;
