//! Named service port resolution.
//!
//! Controller services are addressed by small integer ports that are looked
//! up by name. Ports may be re-bound between blocks, so callers resolve them
//! every time they build an action.

use blockbridge_types::StoragePort;
use std::sync::Arc;
use thiserror::Error;

/// Name of the storage service port carried by begin and end actions.
pub const STORAGE_PORT_NAME: &str = "storage";

/// Errors that can occur during port resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    /// No port is registered under the name.
    #[error("no port registered for {0:?}")]
    Unknown(String),

    /// The name is already bound to a different port.
    #[error("port name {name:?} already bound to {existing}")]
    AlreadyBound {
        /// Port name
        name: String,
        /// Port currently bound to the name
        existing: StoragePort,
    },

    /// The port number is already used by another name.
    #[error("port {port} already used by {owner:?}")]
    PortInUse {
        /// Requested port number
        port: StoragePort,
        /// Name currently owning the port
        owner: String,
    },

    /// Port numbers start at 1.
    #[error("port 0 is reserved")]
    Reserved,

    /// Every port number is bound.
    #[error("no free port left")]
    Exhausted,
}

/// Result type for port operations.
pub type PortResult<T> = Result<T, PortError>;

/// Resolves service names to ports.
pub trait PortResolver: Send + Sync {
    /// Resolve the port currently bound to `name`.
    fn resolve_port(&self, name: &str) -> PortResult<StoragePort>;
}

impl<T: PortResolver + ?Sized> PortResolver for Arc<T> {
    fn resolve_port(&self, name: &str) -> PortResult<StoragePort> {
        (**self).resolve_port(name)
    }
}
