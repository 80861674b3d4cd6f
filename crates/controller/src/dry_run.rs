//! Accept-everything controller for dry runs.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use blockbridge_core::{CallContext, ChannelResult, ControllerChannel};
use tracing::info;

/// Logs every action and replies `null` without contacting a controller.
#[derive(Debug, Default)]
pub struct DryRunChannel {
    calls: AtomicU64,
}

impl DryRunChannel {
    /// Create a dry-run channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions received.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ControllerChannel for DryRunChannel {
    async fn send(&self, payload: String, ctx: CallContext) -> ChannelResult<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        info!(call = %ctx, action = %payload, "Dry run");
        Ok("null".to_string())
    }
}
