//! Netstring framing for stream controller links.
//!
//! ## Wire Format
//!
//! ```text
//! <decimal length>:<payload bytes>,
//! ```
//!
//! `12:hello world!,` carries the 12-byte payload `hello world!`. Lengths
//! are plain ASCII digits; anything else before the colon is rejected.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

pub use blockbridge_types::DEFAULT_MAX_FRAME_BYTES;

/// Longest length prefix accepted before a colon must appear.
const MAX_PREFIX_DIGITS: usize = 20;

/// Errors that can occur while decoding netstrings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetstringError {
    /// The length prefix is not a decimal integer.
    #[error("unparseable size {0:?}, should be integer")]
    UnparseableSize(String),

    /// The payload was not followed by a comma.
    #[error("malformed netstring: not terminated by comma")]
    MissingComma,

    /// The declared payload exceeds the configured limit.
    #[error("frame too large: {size} > {max}")]
    FrameTooLarge {
        /// Declared payload size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },
}

/// Wrap a payload in a netstring.
pub fn encode(payload: &[u8]) -> Bytes {
    let prefix = format!("{}:", payload.len());
    let mut buf = BytesMut::with_capacity(prefix.len() + payload.len() + 1);
    buf.put_slice(prefix.as_bytes());
    buf.put_slice(payload);
    buf.put_u8(b',');
    buf.freeze()
}

/// Incremental netstring decoder.
///
/// Feed it bytes as they arrive with [`extend`](Self::extend) and pull
/// complete payloads with [`next_frame`](Self::next_frame). Partial frames
/// stay buffered until the rest arrives.
#[derive(Debug)]
pub struct NetstringDecoder {
    buffer: BytesMut,
    max_frame_bytes: usize,
}

impl NetstringDecoder {
    /// Create a decoder that rejects payloads over `max_frame_bytes`.
    pub fn new(max_frame_bytes: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            max_frame_bytes,
        }
    }

    /// Append received bytes.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Bytes received but not yet part of a complete frame.
    pub fn leftover(&self) -> &[u8] {
        &self.buffer
    }

    /// Decode the next complete payload, if one is buffered.
    pub fn next_frame(&mut self) -> Result<Option<Bytes>, NetstringError> {
        let colon = match self.buffer.iter().position(|b| *b == b':') {
            Some(colon) => colon,
            None => {
                // Fail early on garbage instead of buffering forever.
                if self.buffer.len() > MAX_PREFIX_DIGITS
                    || self.buffer.iter().any(|b| !b.is_ascii_digit())
                {
                    return Err(NetstringError::UnparseableSize(
                        String::from_utf8_lossy(&self.buffer).into_owned(),
                    ));
                }
                return Ok(None);
            }
        };

        let size = parse_size(&self.buffer[..colon])?;
        if size > self.max_frame_bytes {
            return Err(NetstringError::FrameTooLarge {
                size,
                max: self.max_frame_bytes,
            });
        }

        let total = colon + 1 + size + 1;
        if self.buffer.len() < total {
            return Ok(None);
        }
        if self.buffer[colon + 1 + size] != b',' {
            return Err(NetstringError::MissingComma);
        }

        let mut frame = self.buffer.split_to(total);
        frame.advance(colon + 1);
        frame.truncate(size);
        Ok(Some(frame.freeze()))
    }

    /// Decode every complete payload currently buffered.
    pub fn decode_all(&mut self) -> Result<Vec<Bytes>, NetstringError> {
        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame()? {
            frames.push(frame);
        }
        Ok(frames)
    }
}

impl Default for NetstringDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_BYTES)
    }
}

fn parse_size(prefix: &[u8]) -> Result<usize, NetstringError> {
    let unparseable = || NetstringError::UnparseableSize(String::from_utf8_lossy(prefix).into_owned());
    if prefix.is_empty() || !prefix.iter().all(u8::is_ascii_digit) {
        return Err(unparseable());
    }
    std::str::from_utf8(prefix)
        .map_err(|_| unparseable())?
        .parse()
        .map_err(|_| unparseable())
}
