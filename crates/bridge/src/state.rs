//! End-to-commit handoff cell.
//!
//! The host's commit callback carries no block metadata, so the end phase
//! leaves the block's height and time here for the commit phase to pick up.
//! The cell is written only by end block and read only by commit block; it
//! is never cleared, just overwritten by the next end block.

use blockbridge_types::{BlockHeight, BlockMeta, BlockTime};
use parking_lot::Mutex;

/// Snapshot of the values carried from end block to commit block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeState {
    /// Height recorded by the most recent successful end block
    pub last_end_height: BlockHeight,
    /// Time recorded by the most recent successful end block
    pub last_end_time: BlockTime,
    initialized: bool,
}

impl BridgeState {
    /// Height and time as block metadata.
    pub fn meta(&self) -> BlockMeta {
        BlockMeta::new(self.last_end_height, self.last_end_time)
    }

    /// Whether an end block has ever been recorded.
    ///
    /// `false` means the values are the zero defaults.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// Single-slot cell owned by the bridge.
#[derive(Debug, Default)]
pub(crate) struct HandoffCell {
    slot: Mutex<BridgeState>,
}

impl HandoffCell {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot with the block that just ended.
    pub(crate) fn record_end(&self, meta: BlockMeta) {
        let mut slot = self.slot.lock();
        slot.last_end_height = meta.height;
        slot.last_end_time = meta.time;
        slot.initialized = true;
    }

    pub(crate) fn snapshot(&self) -> BridgeState {
        *self.slot.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_zeroed_and_uninitialized() {
        let cell = HandoffCell::new();
        let state = cell.snapshot();
        assert!(!state.is_initialized());
        assert!(state.meta().is_zero());
    }

    #[test]
    fn test_record_overwrites() {
        let cell = HandoffCell::new();
        cell.record_end(BlockMeta::new(10, 100));
        cell.record_end(BlockMeta::new(11, 105));

        let state = cell.snapshot();
        assert!(state.is_initialized());
        assert_eq!(state.last_end_height, 11);
        assert_eq!(state.last_end_time, 105);
    }

    #[test]
    fn test_snapshot_does_not_clear() {
        let cell = HandoffCell::new();
        cell.record_end(BlockMeta::new(4, 40));
        assert_eq!(cell.snapshot(), cell.snapshot());
    }
}
