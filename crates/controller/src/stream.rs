//! Netstring controller link over an async byte stream.
//!
//! Requests are written as netstrings and the next netstring read back is
//! the reply. One request is in flight at a time. Any I/O or framing error
//! leaves the stream in an unknown position, so the link refuses further
//! calls afterwards.

use async_trait::async_trait;
use blockbridge_core::{CallContext, ChannelError, ChannelResult, ControllerChannel};
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::netstring::{self, NetstringDecoder};
use crate::reply::ControllerReply;

const READ_CHUNK: usize = 8 * 1024;

struct StreamIo<R, W> {
    reader: R,
    writer: W,
    decoder: NetstringDecoder,
    broken: bool,
}

/// Controller channel over a reader/writer pair.
pub struct StreamChannel<R, W> {
    io: Mutex<StreamIo<R, W>>,
}

impl<R, W> StreamChannel<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Create a channel reading replies from `reader` and writing requests
    /// to `writer`.
    pub fn new(reader: R, writer: W, max_frame_bytes: usize) -> Self {
        Self {
            io: Mutex::new(StreamIo {
                reader,
                writer,
                decoder: NetstringDecoder::new(max_frame_bytes),
                broken: false,
            }),
        }
    }

    /// Whether an earlier failure made the link unusable.
    pub async fn is_broken(&self) -> bool {
        self.io.lock().await.broken
    }

    async fn round_trip(io: &mut StreamIo<R, W>, payload: &[u8]) -> ChannelResult<Bytes> {
        io.writer.write_all(&netstring::encode(payload)).await?;
        io.writer.flush().await?;

        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some(frame) = io
                .decoder
                .next_frame()
                .map_err(|e| ChannelError::Protocol(e.to_string()))?
            {
                return Ok(frame);
            }

            let n = io.reader.read(&mut chunk).await?;
            if n == 0 {
                return Err(ChannelError::Closed);
            }
            trace!(bytes = n, "Read from controller");
            io.decoder.extend(&chunk[..n]);
        }
    }
}

#[async_trait]
impl<R, W> ControllerChannel for StreamChannel<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&self, payload: String, ctx: CallContext) -> ChannelResult<String> {
        let mut io = self.io.lock().await;
        if io.broken {
            return Err(ChannelError::Closed);
        }

        debug!(call = %ctx, bytes = payload.len(), "Calling controller");
        match Self::round_trip(&mut io, payload.as_bytes()).await {
            Ok(frame) => ControllerReply::parse(&frame)?.into_result(),
            Err(e) => {
                warn!(call = %ctx, error = %e, "Controller link failed");
                io.broken = true;
                Err(e)
            }
        }
    }
}
