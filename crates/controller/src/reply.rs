//! Controller reply envelope.
//!
//! Every reply frame on a stream link is a JSON object:
//!
//! ```text
//! {"ok":true,"result":<any JSON>}
//! {"ok":false,"error":"<message>"}
//! ```

use blockbridge_core::{ChannelError, ChannelResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded controller reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerReply {
    /// Whether the controller processed the request successfully
    pub ok: bool,
    /// Result payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure message when `ok` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ControllerReply {
    /// A successful reply.
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    /// A failed reply.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(message.into()),
        }
    }

    /// Parse a reply frame.
    pub fn parse(frame: &[u8]) -> ChannelResult<Self> {
        serde_json::from_slice(frame)
            .map_err(|e| ChannelError::Protocol(format!("invalid reply: {}", e)))
    }

    /// Encode the reply as a JSON frame body.
    pub fn to_json(&self) -> String {
        // A struct of bool, Value and String always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Convert into the channel's result: the raw result JSON or a rejection.
    pub fn into_result(self) -> ChannelResult<String> {
        if self.ok {
            Ok(self.result.unwrap_or(Value::Null).to_string())
        } else {
            Err(ChannelError::Rejected(
                self.error
                    .unwrap_or_else(|| "controller reported failure without a message".to_string()),
            ))
        }
    }
}
