//! # Block Bridge Controller Links
//!
//! Concrete [`ControllerChannel`](blockbridge_core::ControllerChannel)
//! implementations:
//!
//! - [`ProcessChannel`] - controller as a child process speaking netstrings
//!   over stdio
//! - [`StreamChannel`] - the same protocol over any async reader/writer
//! - [`TranscriptChannel`] - decorator recording every call as JSON lines
//! - [`DryRunChannel`] - accepts everything, for exercising a host without a
//!   controller
//!
//! ## Protocol
//!
//! ```text
//! bridge → controller:  netstring(<action JSON>)
//! controller → bridge:  netstring({"ok":true,"result":...} | {"ok":false,"error":"..."})
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod dry_run;
pub mod netstring;
pub mod process;
pub mod reply;
pub mod stream;
pub mod transcript;

// Re-export main types at crate root
pub use dry_run::DryRunChannel;
pub use netstring::{NetstringDecoder, NetstringError, DEFAULT_MAX_FRAME_BYTES};
pub use process::ProcessChannel;
pub use reply::ControllerReply;
pub use stream::StreamChannel;
pub use transcript::{
    read_transcript, TranscriptChannel, TranscriptEntry, TranscriptError, TranscriptResult,
};
