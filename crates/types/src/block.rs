//! Block metadata supplied by the host consensus engine.
//!
//! This module provides the block-related types:
//! - [`BlockContext`] - Height and time of the block being processed
//! - [`BlockMeta`] - The seconds-resolution pair carried on the wire
//! - [`BeginBlockRequest`] / [`EndBlockRequest`] - Per-phase request metadata
//! - [`ValidatorUpdate`] - Validator power changes returned from end block

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Block height as understood by the controller (signed 64-bit on the wire).
pub type BlockHeight = i64;

/// Block time in whole Unix seconds.
pub type BlockTime = i64;

/// Numeric identifier of a named controller service endpoint.
pub type StoragePort = u32;

/// Height and time of the block currently being processed.
///
/// Handed to the begin and end phases by the host. The commit phase never
/// receives one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContext {
    /// Block height
    pub height: BlockHeight,
    /// Block time as reported by consensus
    pub time: DateTime<Utc>,
}

impl BlockContext {
    /// Create a context from a height and a UTC timestamp.
    pub fn new(height: BlockHeight, time: DateTime<Utc>) -> Self {
        Self { height, time }
    }

    /// Create a context from a height and whole Unix seconds.
    ///
    /// Returns `None` if the seconds value is outside chrono's range.
    pub fn from_unix(height: BlockHeight, seconds: BlockTime) -> Option<Self> {
        Utc.timestamp_opt(seconds, 0)
            .single()
            .map(|time| Self { height, time })
    }

    /// Block time truncated to whole Unix seconds.
    pub fn unix_seconds(&self) -> BlockTime {
        self.time.timestamp()
    }

    /// The wire-level metadata for this block.
    pub fn meta(&self) -> BlockMeta {
        BlockMeta::new(self.height, self.unix_seconds())
    }
}

/// Height and seconds-resolution time, exactly as sent to the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockMeta {
    /// Block height
    pub height: BlockHeight,
    /// Unix seconds
    pub time: BlockTime,
}

impl BlockMeta {
    /// Zero height and time, the value held before any end block.
    pub const ZERO: BlockMeta = BlockMeta { height: 0, time: 0 };

    /// Create block metadata.
    pub const fn new(height: BlockHeight, time: BlockTime) -> Self {
        Self { height, time }
    }

    /// Check whether this is the zero value.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for BlockMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "height={} time={}", self.height, self.time)
    }
}

/// Request metadata delivered with the begin phase.
///
/// The bridge only logs these fields; the controller never sees them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeginBlockRequest {
    /// Hex-encoded block hash, if the host provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Proposer address, if the host provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposer: Option<String>,
}

/// Request metadata delivered with the end phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndBlockRequest {
    /// Height the host believes it is ending
    pub height: BlockHeight,
}

impl EndBlockRequest {
    /// Create an end block request for a height.
    pub fn new(height: BlockHeight) -> Self {
        Self { height }
    }
}

/// A change to a validator's voting power.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorUpdate {
    /// Validator public key bytes
    pub pub_key: Vec<u8>,
    /// New voting power (0 removes the validator)
    pub power: i64,
}

/// The set of validator updates produced by end block.
pub type ValidatorUpdateSet = Vec<ValidatorUpdate>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_seconds_truncates_subsecond_time() {
        let time = Utc.timestamp_opt(1_700_000_000, 999_000_000).unwrap();
        let ctx = BlockContext::new(7, time);
        assert_eq!(ctx.unix_seconds(), 1_700_000_000);
        assert_eq!(ctx.meta(), BlockMeta::new(7, 1_700_000_000));
    }

    #[test]
    fn test_zero_meta() {
        assert!(BlockMeta::default().is_zero());
        assert!(!BlockMeta::new(1, 0).is_zero());
    }
}
