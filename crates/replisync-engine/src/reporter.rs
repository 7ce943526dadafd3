//! Reporting seam between the reconciler and the outside world
//!
//! The reconciler never talks to a logger directly. It is handed a reporter,
//! constructed once at process start and threaded through calls, so tests can
//! swap in an in-memory collector.

use replisync_types::{Error, SyncAction};
use std::sync::Mutex;
use tracing::{error, info};

/// Receives every applied action and every recorded error of a pass
pub trait SyncReporter: Send + Sync {
    /// An action was applied to the destination tree
    fn action(&self, action: &SyncAction);

    /// An error was recorded; the pass continues unless it was fatal
    fn error(&self, error: &Error);
}

/// Reporter that emits one tracing event per action and error
///
/// Timestamping and fan-out to console and log file are the subscriber's
/// concern, configured by the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl SyncReporter for TracingReporter {
    fn action(&self, action: &SyncAction) {
        info!("{}", action);
    }

    fn error(&self, error: &Error) {
        error!("{}", error);
    }
}

/// Reporter that collects actions and errors in memory, for tests
#[derive(Debug, Default)]
pub struct CollectingReporter {
    actions: Mutex<Vec<SyncAction>>,
    errors: Mutex<Vec<String>>,
}

impl CollectingReporter {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the actions reported so far
    pub fn actions(&self) -> Vec<SyncAction> {
        self.actions.lock().expect("reporter lock poisoned").clone()
    }

    /// Snapshot of the error messages reported so far
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("reporter lock poisoned").clone()
    }
}

impl SyncReporter for CollectingReporter {
    fn action(&self, action: &SyncAction) {
        self.actions
            .lock()
            .expect("reporter lock poisoned")
            .push(action.clone());
    }

    fn error(&self, error: &Error) {
        self.errors
            .lock()
            .expect("reporter lock poisoned")
            .push(error.to_string());
    }
}
