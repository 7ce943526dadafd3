//! Fixed-interval pass scheduling
//!
//! The scheduler owns the interval and the termination condition; the
//! reconciler stays free of timing concerns. Passes never overlap: one pass
//! runs to completion, then the scheduler sleeps the fixed interval before
//! invoking the next. The only cancellation point is between passes.

use console::style;
use replisync_engine::{PassSummary, Reconciler, SyncReporter, SyncRequest};
use replisync_types::Result;
use std::time::Duration;
use tracing::{error, info, warn};

/// Repeatedly invokes reconciliation passes at a fixed interval
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    once: bool,
    quiet: bool,
}

impl Scheduler {
    /// Create a scheduler with the given interval between passes
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            once: false,
            quiet: false,
        }
    }

    /// Run a single pass and stop instead of looping
    pub fn run_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    /// Suppress the per-pass console summary
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Run passes until ctrl-c (or after one pass in once mode)
    ///
    /// A recoverable pass failure (source directory temporarily gone) is
    /// logged and retried on the next interval. Unrecoverable errors
    /// propagate to the caller and end the process.
    pub async fn run(
        &self,
        reconciler: &Reconciler,
        base: &SyncRequest,
        reporter: &dyn SyncReporter,
    ) -> Result<()> {
        loop {
            let request = base.renew();

            match reconciler.synchronize(&request, reporter).await {
                Ok(summary) => {
                    if !self.quiet {
                        print_pass_summary(&summary);
                    }
                }
                Err(e) if e.is_recoverable() => {
                    error!("Pass failed, retrying next interval: {}", e);
                }
                Err(e) => return Err(e),
            }

            if self.once {
                return Ok(());
            }

            tokio::select! {
                () = tokio::time::sleep(self.interval) => {}
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        warn!("Failed to listen for shutdown signal: {}", e);
                    }
                    info!("Shutdown requested, stopping after completed pass");
                    return Ok(());
                }
            }
        }
    }
}

fn print_pass_summary(summary: &PassSummary) {
    let stats = &summary.stats;
    if stats.is_clean_noop() {
        println!(
            "{} Pass complete: destination already in sync ({} files unchanged)",
            style("✓").green(),
            stats.files_unchanged
        );
        return;
    }

    println!(
        "{} Pass complete: {} dirs created, {} files copied ({} bytes), {} files / {} dirs deleted, {} unchanged, {} errors in {:?}",
        if stats.errors == 0 {
            style("✓").green()
        } else {
            style("!").yellow()
        },
        style(stats.dirs_created).green(),
        style(stats.files_copied).green(),
        stats.bytes_copied,
        style(stats.files_deleted).red(),
        style(stats.dirs_deleted).red(),
        stats.files_unchanged,
        if stats.errors > 0 {
            style(stats.errors).red()
        } else {
            style(stats.errors).green()
        },
        stats.duration
    );
}
