//! replisync - one-way periodic directory mirroring
//!
//! Keeps a replica directory identical to a source directory: every file and
//! subdirectory present in the source exists identically in the replica, and
//! anything in the replica absent from the source is removed. Change
//! detection is content-digest based, so timestamps never cause a copy to be
//! skipped wrongly.

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::style;
use replisync_digest::CompareConfig;
use replisync_engine::{Reconciler, SyncOptions, SyncRequest, TracingReporter};
use scheduler::Scheduler;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

mod logging;
mod scheduler;

/// replisync - one-way periodic directory mirroring
#[derive(Parser)]
#[command(
    name = "replisync",
    version = env!("CARGO_PKG_VERSION"),
    about = "One-way periodic directory mirroring",
    long_about = "replisync periodically synchronizes a replica directory to exactly\n\
                  mirror a source directory. Files are compared by content digest,\n\
                  never by modification time, and every create, copy, and delete is\n\
                  logged to the console and to an append-only log file."
)]
struct Cli {
    /// Source directory, treated as ground truth and never modified
    source: PathBuf,

    /// Replica directory, mutated to match the source (created if absent)
    destination: PathBuf,

    /// Log file, appended with one timestamped line per action and error
    log_file: PathBuf,

    /// Seconds between passes (positive, decimals allowed)
    #[arg(value_parser = parse_interval)]
    interval: f64,

    /// Run a single pass and exit
    #[arg(long)]
    once: bool,

    /// Report actions without modifying the replica
    #[arg(long)]
    dry_run: bool,

    /// Compare by digest even when file sizes already differ
    #[arg(long)]
    no_size_prefilter: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode - errors only on the console
    #[arg(short, long)]
    quiet: bool,
}

fn parse_interval(raw: &str) -> std::result::Result<f64, String> {
    let seconds: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err("sync interval must be a positive number of seconds".to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(&cli.log_file, cli.debug, cli.quiet)?;

    info!("replisync v{} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Sync parameters: source '{}', replica '{}', interval {}s",
        cli.source.display(),
        cli.destination.display(),
        cli.interval
    );

    // Configuration errors are fatal before any synchronization attempt.
    let source_meta = std::fs::metadata(&cli.source).with_context(|| {
        format!(
            "source directory '{}' does not exist or is not accessible",
            cli.source.display()
        )
    })?;
    if !source_meta.is_dir() {
        bail!("source path '{}' is not a directory", cli.source.display());
    }

    if !cli.quiet {
        println!(
            "{} Mirroring {} -> {} every {}s{}",
            style("⟲").blue().bold(),
            style(cli.source.display()).cyan(),
            style(cli.destination.display()).cyan(),
            cli.interval,
            if cli.dry_run { " (dry run)" } else { "" }
        );
    }

    let options = SyncOptions {
        dry_run: cli.dry_run,
        compare: CompareConfig {
            size_prefilter: !cli.no_size_prefilter,
        },
    };
    let base = SyncRequest::new(&cli.source, &cli.destination).with_options(options);

    let scheduler = Scheduler::new(Duration::from_secs_f64(cli.interval))
        .run_once(cli.once)
        .quiet(cli.quiet);

    scheduler
        .run(&Reconciler::new(), &base, &TracingReporter)
        .await?;

    info!("replisync stopped");
    Ok(())
}
