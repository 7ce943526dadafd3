//! Tree reconciliation engine for replisync
//!
//! This crate implements the core of replisync: one-way mirroring of a
//! destination directory tree from a source tree. One pass scans both trees,
//! builds a pure plan, and applies it — creating missing directories, copying
//! files whose content digest differs, and pruning destination entries the
//! source no longer has, deepest-first.
//!
//! Passes are stateless and idempotent: nothing is retained between runs, so
//! the fixed-interval scheduler simply invokes [`Reconciler::synchronize`]
//! again and the pass recomputes everything from the live filesystem.
//!
//! # Examples
//!
//! ```rust,no_run
//! use replisync_engine::{Reconciler, SyncRequest, TracingReporter};
//!
//! # async fn example() -> replisync_types::Result<()> {
//! let request = SyncRequest::new("data", "replica");
//! let summary = Reconciler::new()
//!     .synchronize(&request, &TracingReporter)
//!     .await?;
//! println!("{} actions, {} errors", summary.actions.len(), summary.errors.len());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod plan;
pub mod reconciler;
pub mod reporter;
pub mod walker;

pub use plan::SyncPlan;
pub use reconciler::{PassSummary, Reconciler, SyncOptions, SyncRequest};
pub use reporter::{CollectingReporter, SyncReporter, TracingReporter};
pub use walker::{scan_tree, TreeSnapshot};
