//! Controller call transcripts.
//!
//! [`TranscriptChannel`] wraps another channel and appends one JSON line per
//! call: what was sent, and what came back. A transcript can later be fed
//! to the same or a fixed controller to check that it reproduces the same
//! outcomes.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use blockbridge_core::{CallContext, ChannelResult, ControllerChannel};
use blockbridge_types::{BlockHeight, Phase};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can occur while writing or reading transcripts.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Transcript file could not be opened, written or read
    #[error("transcript I/O error: {0}")]
    Io(#[from] io::Error),

    /// A transcript line is not a valid entry
    #[error("invalid transcript entry on line {line}: {source}")]
    InvalidEntry {
        /// 1-based line number
        line: usize,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// An entry could not be serialized
    #[error("failed to serialize transcript entry: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result type for transcript operations.
pub type TranscriptResult<T> = Result<T, TranscriptError>;

/// One recorded controller call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Position of the call within the recording, starting at 1
    pub seq: u64,
    /// Lifecycle phase that issued the call
    pub phase: Phase,
    /// Height carried by the action
    pub block_height: BlockHeight,
    /// Payload sent to the controller
    pub request: String,
    /// Reply on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Error text on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 time the call completed
    pub recorded_at: String,
}

impl TranscriptEntry {
    /// The recorded outcome: reply text or error text.
    pub fn outcome(&self) -> Result<&str, &str> {
        match (&self.response, &self.error) {
            (_, Some(error)) => Err(error),
            (Some(response), None) => Ok(response),
            (None, None) => Ok(""),
        }
    }

    /// Call context reconstructed from the entry.
    pub fn call_context(&self) -> CallContext {
        CallContext::new(self.phase, self.block_height)
    }
}

/// Channel decorator that records every call.
pub struct TranscriptChannel<C> {
    inner: C,
    writer: Mutex<Box<dyn Write + Send>>,
    next_seq: AtomicU64,
    path: Option<PathBuf>,
}

impl<C: ControllerChannel> TranscriptChannel<C> {
    /// Record calls to `inner` by appending to the file at `path`.
    pub fn create(inner: C, path: &Path) -> TranscriptResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = %path.display(), "Recording controller transcript");

        let mut channel = Self::with_writer(inner, Box::new(file));
        channel.path = Some(path.to_path_buf());
        Ok(channel)
    }

    /// Record calls to `inner` into an arbitrary writer.
    pub fn with_writer(inner: C, writer: Box<dyn Write + Send>) -> Self {
        Self {
            inner,
            writer: Mutex::new(writer),
            next_seq: AtomicU64::new(1),
            path: None,
        }
    }

    /// Transcript file path, if recording to a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of calls recorded so far.
    pub fn recorded(&self) -> u64 {
        self.next_seq.load(Ordering::SeqCst) - 1
    }

    /// The wrapped channel.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn append(&self, entry: &TranscriptEntry) -> TranscriptResult<()> {
        let line = serde_json::to_string(entry).map_err(TranscriptError::Serialize)?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl<C: ControllerChannel> ControllerChannel for TranscriptChannel<C> {
    async fn send(&self, payload: String, ctx: CallContext) -> ChannelResult<String> {
        let result = self.inner.send(payload.clone(), ctx).await;

        let entry = TranscriptEntry {
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            phase: ctx.phase,
            block_height: ctx.height,
            request: payload,
            response: result.as_ref().ok().cloned(),
            error: result.as_ref().err().map(|e| e.to_string()),
            recorded_at: chrono::Utc::now().to_rfc3339(),
        };
        // Recording failures never change the call outcome.
        if let Err(e) = self.append(&entry) {
            error!(seq = entry.seq, error = %e, "Failed to record transcript entry");
        }

        result
    }
}

/// Read every entry from a transcript file. Blank lines are skipped.
pub fn read_transcript(path: &Path) -> TranscriptResult<Vec<TranscriptEntry>> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|source| TranscriptError::InvalidEntry {
            line: index + 1,
            source,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}
