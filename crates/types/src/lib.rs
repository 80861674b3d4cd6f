//! # Block Bridge Types
//!
//! Core type definitions shared by every Block Bridge crate.
//!
//! This crate provides:
//! - [`PhaseAction`] - The closed set of actions sent to the controller
//! - [`Phase`] - The three block lifecycle phases (begin, end, commit)
//! - [`BlockContext`] and [`BlockMeta`] - Block metadata supplied by the host
//! - [`ValidatorUpdate`] - Validator set changes returned from the end phase
//!
//! ## Example
//!
//! ```rust
//! use blockbridge_types::{BlockMeta, PhaseAction};
//!
//! let meta = BlockMeta::new(500, 1_700_000_000);
//! let action = PhaseAction::commit_block(meta);
//!
//! assert_eq!(
//!     action.encode().unwrap(),
//!     r#"{"type":"COMMIT_BLOCK","blockHeight":500,"blockTime":1700000000}"#
//! );
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod action;
pub mod block;

// Re-export main types at crate root
pub use action::{BeginBlockAction, CommitBlockAction, EndBlockAction, Phase, PhaseAction};
pub use block::{
    BeginBlockRequest, BlockContext, BlockHeight, BlockMeta, BlockTime, EndBlockRequest,
    StoragePort, ValidatorUpdate, ValidatorUpdateSet,
};

/// Default upper bound on a single controller frame's payload (16 MiB).
pub const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Result type alias for action encoding and decoding
pub type ActionResult<T> = std::result::Result<T, ActionError>;

/// Errors that can occur when encoding or decoding actions
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The action could not be serialized to JSON
    #[error("failed to encode {phase} action: {source}")]
    Encode {
        /// Phase of the action being encoded
        phase: Phase,
        /// Underlying serializer error
        #[source]
        source: serde_json::Error,
    },

    /// A payload could not be decoded into an action
    #[error("failed to decode action: {0}")]
    Decode(#[source] serde_json::Error),
}
