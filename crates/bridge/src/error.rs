//! Bridge error types
//!
//! Errors are split by what the host may do about them. Everything except
//! [`BridgeError::Fatal`] leaves the controller untouched or in a state the
//! host can reject and move past. A fatal inconsistency means the controller
//! may have applied effects that consensus will not agree on; the only safe
//! response is to stop and replay from a durable checkpoint.

use blockbridge_core::{ChannelError, PortError};
use blockbridge_types::{ActionError, BlockMeta, Phase};
use thiserror::Error;

/// The controller failed after it may have applied irreversible effects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("controller state inconsistent after {phase} at {meta}: {source}")]
pub struct FatalInconsistency {
    /// Phase whose controller call failed (end or commit)
    pub phase: Phase,
    /// Height and time carried by the failed action
    pub meta: BlockMeta,
    /// Underlying channel failure
    #[source]
    pub source: ChannelError,
}

/// Errors returned by the lifecycle bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The action could not be serialized; nothing was sent
    #[error(transparent)]
    Encoding(#[from] ActionError),

    /// The storage port could not be resolved; nothing was sent
    #[error("failed to resolve storage port: {0}")]
    PortResolution(#[from] PortError),

    /// The controller call failed in a phase that has no irreversible effects
    #[error("controller call failed during {phase}: {source}")]
    Channel {
        /// Phase whose controller call failed
        phase: Phase,
        /// Underlying channel failure
        #[source]
        source: ChannelError,
    },

    /// The controller call failed in a phase that may have applied effects
    #[error(transparent)]
    Fatal(#[from] FatalInconsistency),
}

impl BridgeError {
    /// Whether this error means the process must not continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BridgeError::Fatal(_))
    }

    /// The phase that failed, where known.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            BridgeError::Encoding(ActionError::Encode { phase, .. }) => Some(*phase),
            BridgeError::Channel { phase, .. } => Some(*phase),
            BridgeError::Fatal(fatal) => Some(fatal.phase),
            _ => None,
        }
    }
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
