//! Block lifecycle bridge.
//!
//! Relays the host's begin, end and commit callbacks to the controller as
//! [`PhaseAction`]s, one round trip per phase.
//!
//! ## Phase Flow
//!
//! ```text
//! ┌──────────────┐
//! │    BEGIN     │  resolve storage port, send BEGIN_BLOCK
//! │              │  failure: returned to the host (block rejected)
//! └──────┬───────┘
//!        │   (transactions delivered elsewhere)
//!        ▼
//! ┌──────────────┐
//! │     END      │  resolve storage port, send END_BLOCK
//! │              │  success: record height/time in the handoff cell
//! │              │  failure: fatal inconsistency
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    COMMIT    │  read handoff cell, send COMMIT_BLOCK
//! │              │  failure: fatal inconsistency
//! └──────────────┘
//! ```
//!
//! Phases are never retried and never time out. A stalled controller stalls
//! the host, which keeps blocks from being processed out of order.

use std::sync::Arc;

use blockbridge_core::{
    CallContext, ChannelError, ControllerChannel, PortResolver, STORAGE_PORT_NAME,
};
use blockbridge_types::{
    BeginBlockRequest, BlockContext, BlockMeta, EndBlockRequest, Phase, PhaseAction,
    StoragePort, ValidatorUpdateSet,
};
use parking_lot::Mutex;
use tracing::{debug, error, info, trace, warn};

use crate::error::{BridgeError, BridgeResult, FatalInconsistency};
use crate::fatal::FatalHandler;
use crate::state::{BridgeState, HandoffCell};

/// Last phase the bridge completed successfully, for ordering diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedPhase {
    /// The phase that completed
    pub phase: Phase,
    /// Height and time carried by its action
    pub meta: BlockMeta,
}

/// Bridge between the host's block lifecycle and the controller.
pub struct BlockLifecycleBridge<C: ControllerChannel + ?Sized, P: PortResolver + ?Sized> {
    /// Link to the controller
    channel: Arc<C>,
    /// Storage port lookup
    ports: Arc<P>,
    /// Invoked on end/commit failures before the error is returned
    fatal_handler: Arc<dyn FatalHandler>,
    /// End-to-commit handoff
    handoff: HandoffCell,
    /// Most recently completed phase
    last_completed: Mutex<Option<CompletedPhase>>,
}

impl<C: ControllerChannel + ?Sized, P: PortResolver + ?Sized> BlockLifecycleBridge<C, P> {
    /// Create a bridge.
    pub fn new(channel: Arc<C>, ports: Arc<P>, fatal_handler: Arc<dyn FatalHandler>) -> Self {
        Self {
            channel,
            ports,
            fatal_handler,
            handoff: HandoffCell::new(),
            last_completed: Mutex::new(None),
        }
    }

    /// Handle the begin phase of a block.
    ///
    /// Every failure is recoverable: the host may reject the block.
    pub async fn on_block_begin(
        &self,
        ctx: &BlockContext,
        request: &BeginBlockRequest,
    ) -> BridgeResult<()> {
        let meta = ctx.meta();
        self.check_order(Phase::Begin, Some(meta));
        trace!(
            height = meta.height,
            hash = ?request.hash,
            proposer = ?request.proposer,
            "Begin block request"
        );

        let action = PhaseAction::begin_block(self.storage_port()?, meta);
        let payload = action.encode()?;

        debug!(height = meta.height, time = meta.time, "Sending BEGIN_BLOCK");
        if let Err(source) = self
            .channel
            .send(payload, CallContext::new(Phase::Begin, meta.height))
            .await
        {
            return Err(self.channel_failure(Phase::Begin, meta, source));
        }

        self.mark_completed(Phase::Begin, meta);
        Ok(())
    }

    /// Handle the end phase of a block.
    ///
    /// Encoding and port failures happen before anything is sent and are
    /// recoverable. A controller failure is a fatal inconsistency. On success
    /// the block's height and time are kept for the following commit.
    pub async fn on_block_end(
        &self,
        ctx: &BlockContext,
        request: &EndBlockRequest,
    ) -> BridgeResult<ValidatorUpdateSet> {
        let meta = ctx.meta();
        self.check_order(Phase::End, Some(meta));
        if request.height != meta.height {
            warn!(
                request_height = request.height,
                context_height = meta.height,
                "End block request height differs from block context"
            );
        }

        let action = PhaseAction::end_block(self.storage_port()?, meta);
        let payload = action.encode()?;

        debug!(height = meta.height, time = meta.time, "Sending END_BLOCK");
        if let Err(source) = self
            .channel
            .send(payload, CallContext::new(Phase::End, meta.height))
            .await
        {
            return Err(self.channel_failure(Phase::End, meta, source));
        }

        self.handoff.record_end(meta);
        self.mark_completed(Phase::End, meta);
        Ok(ValidatorUpdateSet::new())
    }

    /// Handle the commit phase of a block.
    ///
    /// The host supplies no metadata here; the height and time recorded by
    /// the preceding end block are used. Before any end block those are
    /// zero. A controller failure is a fatal inconsistency.
    pub async fn on_block_commit(&self) -> BridgeResult<()> {
        let state = self.handoff.snapshot();
        let meta = state.meta();
        if !state.is_initialized() {
            warn!("Commit invoked before any end block, sending zero height and time");
        }
        self.check_order(Phase::Commit, None);

        let action = PhaseAction::commit_block(meta);
        let payload = action.encode()?;

        debug!(height = meta.height, time = meta.time, "Sending COMMIT_BLOCK");
        if let Err(source) = self
            .channel
            .send(payload, CallContext::new(Phase::Commit, meta.height))
            .await
        {
            return Err(self.channel_failure(Phase::Commit, meta, source));
        }

        self.mark_completed(Phase::Commit, meta);
        info!(height = meta.height, time = meta.time, "Block committed to controller");
        Ok(())
    }

    /// Values currently held for the next commit.
    pub fn bridge_state(&self) -> BridgeState {
        self.handoff.snapshot()
    }

    /// The most recently completed phase, if any.
    pub fn last_completed(&self) -> Option<CompletedPhase> {
        *self.last_completed.lock()
    }

    /// Resolve the storage port afresh; bindings may change between blocks.
    fn storage_port(&self) -> BridgeResult<StoragePort> {
        let port = self.ports.resolve_port(STORAGE_PORT_NAME)?;
        trace!(port, "Resolved storage port");
        Ok(port)
    }

    /// Classify a failed controller call. Failures after the controller may
    /// have applied block effects go to the fatal handler.
    fn channel_failure(&self, phase: Phase, meta: BlockMeta, source: ChannelError) -> BridgeError {
        if !phase.is_fatal_on_channel_error() {
            warn!(
                phase = %phase,
                height = meta.height,
                error = %source,
                "Controller rejected {}",
                phase.tag()
            );
            return BridgeError::Channel { phase, source };
        }

        let fatal = FatalInconsistency {
            phase,
            meta,
            source,
        };
        error!(
            phase = %phase,
            height = meta.height,
            error = %fatal.source,
            "Controller failed after it may have applied block effects"
        );
        self.fatal_handler.on_fatal(&fatal);
        BridgeError::Fatal(fatal)
    }

    fn mark_completed(&self, phase: Phase, meta: BlockMeta) {
        *self.last_completed.lock() = Some(CompletedPhase { phase, meta });
    }

    /// Log host protocol violations. Never changes what is sent.
    fn check_order(&self, phase: Phase, meta: Option<BlockMeta>) {
        let last = *self.last_completed.lock();
        let expected = last.map(|c| c.phase.next()).unwrap_or(Phase::Begin);
        if phase != expected {
            warn!(
                expected = %expected,
                got = %phase,
                "Host invoked block phases out of order"
            );
        }

        let (Some(last), Some(meta)) = (last, meta) else {
            return;
        };
        if meta.height < last.meta.height || meta.time < last.meta.time {
            warn!(
                previous = %last.meta,
                current = %meta,
                "Block height or time went backwards"
            );
        } else if phase == Phase::End && last.phase == Phase::Begin && last.meta != meta {
            warn!(
                begin = %last.meta,
                end = %meta,
                "End block metadata differs from begin block"
            );
        }
    }
}
