//! Controller channel traits for talking to the execution engine.
//!
//! This module defines the call-and-response link between the bridge and
//! the external controller. The bridge hands the channel a serialized
//! action and waits for the reply; it never inspects the reply beyond
//! success or failure.

use async_trait::async_trait;
use blockbridge_types::{BlockHeight, Phase};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during a controller round trip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The controller is not running or was never started.
    #[error("controller not running")]
    NotRunning,

    /// The controller closed its end of the link.
    #[error("controller closed the channel")]
    Closed,

    /// Reading from or writing to the controller failed.
    #[error("controller I/O failed: {0}")]
    Io(String),

    /// The controller's reply could not be understood.
    #[error("controller protocol violation: {0}")]
    Protocol(String),

    /// The controller processed the request and reported a failure.
    #[error("controller rejected request: {0}")]
    Rejected(String),
}

impl From<std::io::Error> for ChannelError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::UnexpectedEof => {
                ChannelError::Closed
            }
            _ => ChannelError::Io(e.to_string()),
        }
    }
}

/// Result type for controller channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Context describing which phase a controller call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Lifecycle phase issuing the call.
    pub phase: Phase,
    /// Height embedded in the action being sent.
    pub height: BlockHeight,
}

impl CallContext {
    /// Create a call context.
    pub fn new(phase: Phase, height: BlockHeight) -> Self {
        Self { phase, height }
    }
}

impl fmt::Display for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.phase, self.height)
    }
}

/// Synchronous call-and-response link to the controller.
///
/// Each call is exactly one round trip. Implementations must not retry and
/// must not time out on their own: if the controller stalls, so does the
/// caller.
///
/// # Thread Safety
///
/// All implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use blockbridge_core::{CallContext, ControllerChannel, ChannelResult};
/// use blockbridge_types::Phase;
///
/// async fn ping(channel: &impl ControllerChannel) -> ChannelResult<String> {
///     channel.send(r#"{"type":"PING"}"#.to_string(), CallContext::new(Phase::Begin, 0)).await
/// }
/// ```
#[async_trait]
pub trait ControllerChannel: Send + Sync {
    /// Send a UTF-8 JSON payload and wait for the controller's reply.
    async fn send(&self, payload: String, ctx: CallContext) -> ChannelResult<String>;
}

#[async_trait]
impl<T: ControllerChannel + ?Sized> ControllerChannel for Arc<T> {
    async fn send(&self, payload: String, ctx: CallContext) -> ChannelResult<String> {
        (**self).send(payload, ctx).await
    }
}

#[async_trait]
impl<T: ControllerChannel + ?Sized> ControllerChannel for Box<T> {
    async fn send(&self, payload: String, ctx: CallContext) -> ChannelResult<String> {
        (**self).send(payload, ctx).await
    }
}
