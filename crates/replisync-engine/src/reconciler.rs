//! One-way tree reconciliation
//!
//! A pass walks the source tree, consults the content comparator for every
//! file that already has a destination candidate, applies creates and copies,
//! and prunes whatever the destination holds that the source does not. A
//! failure on one entry is recorded and the pass continues; only losing the
//! source root or the destination root aborts the pass, and the next
//! scheduled pass retries from scratch.

use crate::plan::SyncPlan;
use crate::reporter::SyncReporter;
use crate::walker::{scan_tree, TreeSnapshot};
use replisync_digest::{CompareConfig, Comparison, FileComparator};
use replisync_types::{EntryKind, Error, Result, SyncAction, SyncStats};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info};

/// One reconciliation pass over a source/destination pair
#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// Source directory, treated as ground truth and never modified
    pub source: PathBuf,
    /// Destination directory, mutated to match the source
    pub destination: PathBuf,
    /// Pass options
    pub options: SyncOptions,
    /// Request ID for tracking across log lines
    pub request_id: uuid::Uuid,
}

impl SyncRequest {
    /// Create a new sync request with default options
    pub fn new<P: AsRef<Path>>(source: P, destination: P) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            destination: destination.as_ref().to_path_buf(),
            options: SyncOptions::default(),
            request_id: uuid::Uuid::new_v4(),
        }
    }

    /// Set pass options
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Clone this request with a fresh request ID for the next pass
    pub fn renew(&self) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4(),
            ..self.clone()
        }
    }
}

/// Options for a reconciliation pass
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Report actions without touching the destination
    pub dry_run: bool,
    /// Content comparison configuration
    pub compare: CompareConfig,
}

/// Everything one pass did and encountered
#[derive(Debug)]
pub struct PassSummary {
    /// Request ID of the pass
    pub request_id: uuid::Uuid,
    /// Actions applied, in application order
    pub actions: Vec<SyncAction>,
    /// Per-entry errors recorded without aborting the pass
    pub errors: Vec<Error>,
    /// Counters for the pass
    pub stats: SyncStats,
}

impl PassSummary {
    fn new(request_id: uuid::Uuid) -> Self {
        Self {
            request_id,
            actions: Vec::new(),
            errors: Vec::new(),
            stats: SyncStats::new(),
        }
    }

    fn record_action(&mut self, reporter: &dyn SyncReporter, action: SyncAction) {
        match &action {
            SyncAction::CreateDir { .. } => self.stats.dirs_created += 1,
            SyncAction::CopyFile { .. } => self.stats.files_copied += 1,
            SyncAction::DeleteFile { .. } => self.stats.files_deleted += 1,
            SyncAction::DeleteDir { .. } => self.stats.dirs_deleted += 1,
        }
        reporter.action(&action);
        self.actions.push(action);
    }

    fn record_error(&mut self, reporter: &dyn SyncReporter, error: Error) {
        self.stats.errors += 1;
        reporter.error(&error);
        self.errors.push(error);
    }
}

/// The tree reconciler
///
/// Stateless between passes: every invocation recomputes the full comparison
/// from the live filesystem, which is what makes retry-by-next-interval safe.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler;

impl Reconciler {
    /// Create a new reconciler
    pub fn new() -> Self {
        Self
    }

    /// Run one full compare-and-apply pass
    ///
    /// Returns a fatal error only when the source root is unavailable or the
    /// destination root cannot be created or scanned. Everything else is
    /// recorded in the summary and the pass runs to completion.
    pub async fn synchronize(
        &self,
        request: &SyncRequest,
        reporter: &dyn SyncReporter,
    ) -> Result<PassSummary> {
        let started = Instant::now();
        let mut summary = PassSummary::new(request.request_id);
        let comparator = FileComparator::new(request.options.compare);

        info!(
            "Pass {} starting: {} -> {}",
            request.request_id,
            request.source.display(),
            request.destination.display()
        );

        let source_meta = fs::metadata(&request.source).await.map_err(|_| {
            Error::SourceMissing {
                path: request.source.clone(),
            }
        })?;
        if !source_meta.is_dir() {
            return Err(Error::SourceMissing {
                path: request.source.clone(),
            });
        }

        if !request.options.dry_run {
            fs::create_dir_all(&request.destination)
                .await
                .map_err(|e| Error::from_io(&request.destination, &e))?;
        }

        let source = scan_tree(&request.source).await?;
        let dest = match scan_tree(&request.destination).await {
            Ok(snapshot) => snapshot,
            // dry run against a destination that does not exist yet
            Err(Error::FileNotFound { .. }) if request.options.dry_run => TreeSnapshot::empty(),
            Err(e) => return Err(e),
        };

        for error in source.errors.iter().chain(dest.errors.iter()) {
            summary.record_error(reporter, error.clone());
        }

        let plan = SyncPlan::build(&source, &dest);
        debug!(
            "Plan: {} deletions, {} dirs to create, {} candidate files",
            plan.deletions.len(),
            plan.ensure_dirs.len(),
            plan.candidate_files.len()
        );

        self.apply_deletions(request, &plan, reporter, &mut summary)
            .await;
        self.apply_dirs(request, &plan, reporter, &mut summary).await;
        self.apply_files(request, &plan, &comparator, reporter, &mut summary)
            .await;

        summary.stats.duration = started.elapsed();
        info!(
            "Pass {} finished: {} actions, {} unchanged, {} errors in {:?}",
            request.request_id,
            summary.stats.total_actions(),
            summary.stats.files_unchanged,
            summary.stats.errors,
            summary.stats.duration
        );

        Ok(summary)
    }

    /// Prune destination entries absent from the source, deepest-first
    async fn apply_deletions(
        &self,
        request: &SyncRequest,
        plan: &SyncPlan,
        reporter: &dyn SyncReporter,
        summary: &mut PassSummary,
    ) {
        for entry in &plan.deletions {
            let target = request.destination.join(&entry.path);
            let action = match entry.kind {
                EntryKind::File => SyncAction::DeleteFile {
                    path: entry.path.clone(),
                },
                EntryKind::Directory => SyncAction::DeleteDir {
                    path: entry.path.clone(),
                },
            };

            if request.options.dry_run {
                summary.record_action(reporter, action);
                continue;
            }

            let result = match entry.kind {
                EntryKind::File => fs::remove_file(&target).await,
                EntryKind::Directory => fs::remove_dir(&target).await,
            };
            match result {
                Ok(()) => summary.record_action(reporter, action),
                Err(e) => summary.record_error(reporter, Error::from_io(&target, &e)),
            }
        }
    }

    /// Create source directories missing from the destination, parents first
    async fn apply_dirs(
        &self,
        request: &SyncRequest,
        plan: &SyncPlan,
        reporter: &dyn SyncReporter,
        summary: &mut PassSummary,
    ) {
        for path in &plan.ensure_dirs {
            let target = request.destination.join(path);
            let action = SyncAction::CreateDir { path: path.clone() };

            if request.options.dry_run {
                summary.record_action(reporter, action);
                continue;
            }

            match fs::create_dir_all(&target).await {
                Ok(()) => summary.record_action(reporter, action),
                Err(e) => summary.record_error(reporter, Error::from_io(&target, &e)),
            }
        }
    }

    /// Copy files whose content differs, leave identical files untouched
    async fn apply_files(
        &self,
        request: &SyncRequest,
        plan: &SyncPlan,
        comparator: &FileComparator,
        reporter: &dyn SyncReporter,
        summary: &mut PassSummary,
    ) {
        for path in &plan.candidate_files {
            let source = request.source.join(path);
            let target = request.destination.join(path);

            match comparator.compare(&source, &target).await {
                Ok(Comparison::Same) => {
                    summary.stats.files_unchanged += 1;
                }
                Ok(Comparison::Different) => {
                    if request.options.dry_run {
                        let size = fs::metadata(&source).await.map(|m| m.len()).unwrap_or(0);
                        summary.stats.bytes_copied += size;
                        summary.record_action(reporter, SyncAction::CopyFile { path: path.clone() });
                        continue;
                    }
                    match fs::copy(&source, &target).await {
                        Ok(bytes) => {
                            summary.stats.bytes_copied += bytes;
                            summary
                                .record_action(reporter, SyncAction::CopyFile { path: path.clone() });
                        }
                        Err(e) => summary.record_error(reporter, Error::from_io(&source, &e)),
                    }
                }
                Err(e) => summary.record_error(reporter, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::CollectingReporter;
    use tempfile::TempDir;

    #[test]
    fn test_sync_request_builder() {
        let request = SyncRequest::new("source", "dest").with_options(SyncOptions {
            dry_run: true,
            ..SyncOptions::default()
        });

        assert_eq!(request.source, PathBuf::from("source"));
        assert_eq!(request.destination, PathBuf::from("dest"));
        assert!(request.options.dry_run);
    }

    #[tokio::test]
    async fn test_missing_source_is_pass_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let request = SyncRequest::new(
            temp_dir.path().join("absent"),
            temp_dir.path().join("replica"),
        );

        let reporter = CollectingReporter::new();
        let err = Reconciler::new()
            .synchronize(&request, &reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::SourceMissing { .. }));
        assert!(err.is_recoverable());
        assert!(reporter.actions().is_empty());
    }

    #[tokio::test]
    async fn test_source_must_be_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("not-a-dir");
        tokio::fs::write(&file, b"x").await.unwrap();

        let request = SyncRequest::new(file, temp_dir.path().join("replica"));
        let err = Reconciler::new()
            .synchronize(&request, &CollectingReporter::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::SourceMissing { .. }));
    }

    #[tokio::test]
    async fn test_dry_run_reports_without_applying() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let dest = temp_dir.path().join("dst");
        tokio::fs::create_dir_all(source.join("a")).await.unwrap();
        tokio::fs::write(source.join("a/b.txt"), b"hello").await.unwrap();

        let request = SyncRequest::new(&source, &dest).with_options(SyncOptions {
            dry_run: true,
            ..SyncOptions::default()
        });
        let reporter = CollectingReporter::new();
        let summary = Reconciler::new()
            .synchronize(&request, &reporter)
            .await
            .unwrap();

        assert_eq!(summary.stats.dirs_created, 1);
        assert_eq!(summary.stats.files_copied, 1);
        assert_eq!(summary.stats.bytes_copied, 5);
        assert!(!dest.exists());
    }
}
