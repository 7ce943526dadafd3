//! Pure reconciliation planning
//!
//! Given snapshots of the source and destination trees, [`SyncPlan::build`]
//! works out what has to happen without touching the filesystem. Whether an
//! individual file actually needs copying is decided later by the content
//! comparator; the plan only fixes the candidate set and the orderings that
//! keep the apply step safe.

use crate::walker::TreeSnapshot;
use replisync_types::{EntryKind, PathEntry};
use std::path::PathBuf;

/// The ordered work list for one reconciliation pass
///
/// Apply order is `deletions`, then `ensure_dirs`, then `candidate_files`.
/// Pruning first means an entry whose kind changed between the trees (file
/// replaced by directory or vice versa) is removed before its replacement is
/// created.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Destination entries absent from the source, deepest-first so a
    /// directory is only removed after all of its descendants
    pub deletions: Vec<PathEntry>,
    /// Source directories missing from the destination, parents before
    /// children
    pub ensure_dirs: Vec<PathBuf>,
    /// Every source file; the comparator decides copy versus no-op per file
    pub candidate_files: Vec<PathBuf>,
}

impl SyncPlan {
    /// Build a plan from two tree snapshots
    pub fn build(source: &TreeSnapshot, dest: &TreeSnapshot) -> Self {
        let mut plan = Self::default();

        for (path, kind) in &source.entries {
            match kind {
                EntryKind::Directory => {
                    if dest.kind_of(path) != Some(EntryKind::Directory) {
                        plan.ensure_dirs.push(path.clone());
                    }
                }
                EntryKind::File => plan.candidate_files.push(path.clone()),
            }
        }

        // An entry is extra when the source has nothing at that path, or has
        // something of a different kind there.
        for (path, kind) in dest.entries.iter().rev() {
            if source.kind_of(path) != Some(*kind) {
                plan.deletions.push(PathEntry::new(path.clone(), *kind));
            }
        }

        plan
    }

    /// Whether the plan contains no work beyond per-file comparisons
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.ensure_dirs.is_empty() && self.candidate_files.is_empty()
    }
}
