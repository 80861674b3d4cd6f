//! Phase actions sent to the controller.
//!
//! Every block lifecycle phase becomes exactly one [`PhaseAction`]. The action
//! is encoded as a JSON object whose `type` field names the phase:
//!
//! ```text
//! BEGIN_BLOCK:  {"type":"BEGIN_BLOCK","storagePort":<int>,"blockHeight":<int64>,"blockTime":<int64>}
//! END_BLOCK:    {"type":"END_BLOCK","storagePort":<int>,"blockHeight":<int64>,"blockTime":<int64>}
//! COMMIT_BLOCK: {"type":"COMMIT_BLOCK","blockHeight":<int64>,"blockTime":<int64>}
//! ```
//!
//! Field names and tag values are fixed by the controller and must not change.

use crate::block::{BlockHeight, BlockMeta, BlockTime, StoragePort};
use crate::{ActionError, ActionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Block lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Start of block processing
    #[serde(rename = "BEGIN_BLOCK")]
    Begin,
    /// End of transaction delivery for the block
    #[serde(rename = "END_BLOCK")]
    End,
    /// Block has been committed by consensus
    #[serde(rename = "COMMIT_BLOCK")]
    Commit,
}

impl Phase {
    /// All phases in the order the host invokes them.
    pub const ALL: [Phase; 3] = [Phase::Begin, Phase::End, Phase::Commit];

    /// The `type` tag used on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            Phase::Begin => "BEGIN_BLOCK",
            Phase::End => "END_BLOCK",
            Phase::Commit => "COMMIT_BLOCK",
        }
    }

    /// Whether a controller failure in this phase leaves the application
    /// state irrecoverably inconsistent.
    ///
    /// Begin has not applied anything yet. End and commit may have, and can
    /// only be repaired by replaying from a durable checkpoint.
    pub fn is_fatal_on_channel_error(&self) -> bool {
        matches!(self, Phase::End | Phase::Commit)
    }

    /// The phase the host is expected to invoke next.
    pub fn next(&self) -> Phase {
        match self {
            Phase::Begin => Phase::End,
            Phase::End => Phase::Commit,
            Phase::Commit => Phase::Begin,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "begin" | "begin_block" => Ok(Phase::Begin),
            "end" | "end_block" => Ok(Phase::End),
            "commit" | "commit_block" => Ok(Phase::Commit),
            other => Err(format!("unknown phase: {}", other)),
        }
    }
}

/// Begin block action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BeginBlockAction {
    /// Port of the storage service for this block
    pub storage_port: StoragePort,
    /// Block height
    pub block_height: BlockHeight,
    /// Block time in Unix seconds
    pub block_time: BlockTime,
}

/// End block action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EndBlockAction {
    /// Port of the storage service for this block
    pub storage_port: StoragePort,
    /// Block height
    pub block_height: BlockHeight,
    /// Block time in Unix seconds
    pub block_time: BlockTime,
}

/// Commit block action. Carries no storage port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommitBlockAction {
    /// Block height captured by the preceding end block
    pub block_height: BlockHeight,
    /// Block time captured by the preceding end block
    pub block_time: BlockTime,
}

/// An action delivered to the controller for one phase of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PhaseAction {
    /// `BEGIN_BLOCK`
    #[serde(rename = "BEGIN_BLOCK")]
    BeginBlock(BeginBlockAction),
    /// `END_BLOCK`
    #[serde(rename = "END_BLOCK")]
    EndBlock(EndBlockAction),
    /// `COMMIT_BLOCK`
    #[serde(rename = "COMMIT_BLOCK")]
    CommitBlock(CommitBlockAction),
}

impl PhaseAction {
    /// Build a begin block action.
    pub fn begin_block(storage_port: StoragePort, meta: BlockMeta) -> Self {
        PhaseAction::BeginBlock(BeginBlockAction {
            storage_port,
            block_height: meta.height,
            block_time: meta.time,
        })
    }

    /// Build an end block action.
    pub fn end_block(storage_port: StoragePort, meta: BlockMeta) -> Self {
        PhaseAction::EndBlock(EndBlockAction {
            storage_port,
            block_height: meta.height,
            block_time: meta.time,
        })
    }

    /// Build a commit block action.
    pub fn commit_block(meta: BlockMeta) -> Self {
        PhaseAction::CommitBlock(CommitBlockAction {
            block_height: meta.height,
            block_time: meta.time,
        })
    }

    /// The phase this action belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            PhaseAction::BeginBlock(_) => Phase::Begin,
            PhaseAction::EndBlock(_) => Phase::End,
            PhaseAction::CommitBlock(_) => Phase::Commit,
        }
    }

    /// Height and time carried by the action.
    pub fn meta(&self) -> BlockMeta {
        match self {
            PhaseAction::BeginBlock(a) => BlockMeta::new(a.block_height, a.block_time),
            PhaseAction::EndBlock(a) => BlockMeta::new(a.block_height, a.block_time),
            PhaseAction::CommitBlock(a) => BlockMeta::new(a.block_height, a.block_time),
        }
    }

    /// Storage port, if the action carries one.
    pub fn storage_port(&self) -> Option<StoragePort> {
        match self {
            PhaseAction::BeginBlock(a) => Some(a.storage_port),
            PhaseAction::EndBlock(a) => Some(a.storage_port),
            PhaseAction::CommitBlock(_) => None,
        }
    }

    /// Encode the action as its compact JSON wire form.
    pub fn encode(&self) -> ActionResult<String> {
        serde_json::to_string(self).map_err(|source| ActionError::Encode {
            phase: self.phase(),
            source,
        })
    }

    /// Decode an action from its JSON wire form.
    pub fn decode(payload: &str) -> ActionResult<Self> {
        serde_json::from_str(payload).map_err(ActionError::Decode)
    }
}
