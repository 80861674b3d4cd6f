//! Core traits for Block Bridge.
//!
//! This module defines the abstract seams between the lifecycle bridge and
//! the outside world, so different implementations can be swapped in.
//!
//! # Architecture
//!
//! - **Channel**: how serialized actions reach the controller (child process,
//!   socket, in-memory test double)
//! - **Ports**: how named service endpoints resolve to port numbers
//!
//! # Usage
//!
//! ```ignore
//! use blockbridge_core::traits::{ControllerChannel, PortResolver};
//!
//! fn build_bridge<C: ControllerChannel, P: PortResolver>(channel: C, ports: P) {
//!     // Works with any channel and resolver
//! }
//! ```

mod channel;
mod ports;

pub use channel::*;
pub use ports::*;
