//! Fatal inconsistency handling.
//!
//! The bridge classifies a failed end or commit call as a
//! [`FatalInconsistency`] but does not decide how the process dies. The
//! harness injects a [`FatalHandler`]: production nodes use
//! [`AbortProcess`], tests and tools use [`FatalLatch`].

use crate::error::FatalInconsistency;
use parking_lot::Mutex;
use tracing::error;

/// Hook invoked when the controller's state has diverged from consensus.
///
/// Called before the bridge returns [`crate::BridgeError::Fatal`]. A handler
/// that returns lets the error propagate; it must never be used to resume
/// block processing.
pub trait FatalHandler: Send + Sync {
    /// React to a fatal inconsistency.
    fn on_fatal(&self, fatal: &FatalInconsistency);
}

/// Terminates the process immediately.
///
/// An external supervisor is expected to restart the node, which then
/// replays blocks from its last durable checkpoint.
///
/// [`std::process::abort`] runs no destructors, so resources that clean up
/// on drop (a child spawned with `kill_on_drop`, buffered writers) are left
/// as they are. Harnesses that own such resources release them in a handler
/// that runs before this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortProcess;

impl FatalHandler for AbortProcess {
    fn on_fatal(&self, fatal: &FatalInconsistency) {
        error!(
            phase = %fatal.phase,
            height = fatal.meta.height,
            time = fatal.meta.time,
            error = %fatal.source,
            "Controller state is inconsistent, aborting so the node replays from a checkpoint"
        );
        eprintln!("FATAL: {}", fatal);
        std::process::abort();
    }
}

/// Records fatal inconsistencies instead of terminating.
#[derive(Debug, Default)]
pub struct FatalLatch {
    tripped: Mutex<Vec<FatalInconsistency>>,
}

impl FatalLatch {
    /// Create an untripped latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any fatal inconsistency was recorded.
    pub fn is_tripped(&self) -> bool {
        !self.tripped.lock().is_empty()
    }

    /// Number of recorded inconsistencies.
    pub fn count(&self) -> usize {
        self.tripped.lock().len()
    }

    /// The most recently recorded inconsistency.
    pub fn last(&self) -> Option<FatalInconsistency> {
        self.tripped.lock().last().cloned()
    }

    /// Drain all recorded inconsistencies.
    pub fn take(&self) -> Vec<FatalInconsistency> {
        std::mem::take(&mut *self.tripped.lock())
    }
}

impl FatalHandler for FatalLatch {
    fn on_fatal(&self, fatal: &FatalInconsistency) {
        error!(phase = %fatal.phase, height = fatal.meta.height, error = %fatal.source, "Fatal inconsistency recorded");
        self.tripped.lock().push(fatal.clone());
    }
}
