//! Logging fan-out: every action and error goes to the console and to an
//! append-only log file, each line timestamped by the subscriber.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Initialize the global subscriber
///
/// The returned guard must stay alive for the lifetime of the process; the
/// file writer is non-blocking and flushes on drop. The log file is opened in
/// append mode and never truncated across passes or restarts. Console
/// verbosity follows the flags, the file always records actions and errors.
pub fn init(log_file: &Path, debug: bool, quiet: bool) -> Result<WorkerGuard> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("cannot open log file '{}'", log_file.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let console_level = if debug {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(console_level))
        .context("invalid log filter")?;

    let file_level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_filter(console_filter),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(file_level),
        )
        .init();

    Ok(guard)
}
