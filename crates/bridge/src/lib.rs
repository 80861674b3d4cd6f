//! # Block Bridge Lifecycle
//!
//! Relays a consensus engine's block lifecycle to an external, deterministic
//! execution engine (the controller).
//!
//! ## Features
//!
//! - **Exactly-once phase delivery**: begin, end and commit each become one
//!   controller round trip, in host order
//! - **End-to-commit handoff**: the commit phase reuses the height and time
//!   captured by end block, since the host supplies none
//! - **Failure classification**: begin failures are returned to the host;
//!   end and commit failures are fatal inconsistencies handed to an
//!   injected [`FatalHandler`]
//! - **Named ports**: the storage port is resolved through a [`PortRegistry`]
//!   on every begin and end
//!
//! ## Example
//!
//! ```rust,ignore
//! use blockbridge_bridge::{AbortProcess, BlockLifecycleBridge, PortRegistry};
//! use blockbridge_types::{BeginBlockRequest, BlockContext, EndBlockRequest};
//! use std::sync::Arc;
//!
//! let ports = Arc::new(PortRegistry::new());
//! ports.register("storage")?;
//!
//! let bridge = BlockLifecycleBridge::new(channel, ports, Arc::new(AbortProcess));
//!
//! let ctx = BlockContext::from_unix(500, 1_700_000_000).unwrap();
//! bridge.on_block_begin(&ctx, &BeginBlockRequest::default()).await?;
//! bridge.on_block_end(&ctx, &EndBlockRequest::new(500)).await?;
//! bridge.on_block_commit().await?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod bridge;
pub mod error;
pub mod fatal;
pub mod ports;
pub mod state;

// Re-export main types at crate root
pub use bridge::{BlockLifecycleBridge, CompletedPhase};
pub use error::{BridgeError, BridgeResult, FatalInconsistency};
pub use fatal::{AbortProcess, FatalHandler, FatalLatch};
pub use ports::PortRegistry;
pub use state::BridgeState;
