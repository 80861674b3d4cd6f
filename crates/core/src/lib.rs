//! # Block Bridge Core - Core Abstractions
//!
//! This crate provides the traits the lifecycle bridge is written against:
//!
//! - **Controller channel**: a call-and-response link to the execution engine
//! - **Port resolution**: lookup of named controller service endpoints
//!
//! # Design Philosophy
//!
//! 1. **Trait-based abstractions**: the bridge never names a concrete
//!    transport, so tests inject doubles and production injects a child
//!    process.
//!
//! 2. **Minimal dependencies**: only the wire types and error plumbing.
//!
//! 3. **Thread safety**: all traits require `Send + Sync`.
//!
//! # Swappable Components
//!
//! | Component | Trait | Default Impl | Alternatives |
//! |-----------|-------|--------------|--------------|
//! | Controller | `ControllerChannel` | `ProcessChannel` | `StreamChannel`, `DryRunChannel` |
//! | Ports | `PortResolver` | `PortRegistry` | test doubles |

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod traits;

// Re-export commonly used types
pub use traits::{
    // Channel
    CallContext, ChannelError, ChannelResult, ControllerChannel,
    // Ports
    PortError, PortResolver, PortResult, STORAGE_PORT_NAME,
};
