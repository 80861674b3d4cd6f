//! Controller running as a child process.
//!
//! The controller program is spawned with piped stdin and stdout. Requests
//! go to its stdin and replies come back on its stdout, both as netstrings.
//! Its stderr is inherited so controller diagnostics land in the node's log.

use std::process::Stdio;

use async_trait::async_trait;
use blockbridge_core::{CallContext, ChannelError, ChannelResult, ControllerChannel};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::info;

use crate::stream::StreamChannel;

/// Controller channel backed by a child process.
pub struct ProcessChannel {
    program: String,
    child: Mutex<Child>,
    link: StreamChannel<ChildStdout, ChildStdin>,
}

impl ProcessChannel {
    /// Spawn `program` with `args` and connect to its stdio.
    pub fn spawn(program: &str, args: &[String], max_frame_bytes: usize) -> ChannelResult<Self> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ChannelError::Io(format!("failed to spawn {}: {}", program, e)))?;

        let stdin = child.stdin.take().ok_or(ChannelError::NotRunning)?;
        let stdout = child.stdout.take().ok_or(ChannelError::NotRunning)?;

        info!(program, pid = ?child.id(), "Controller process started");

        Ok(Self {
            program: program.to_string(),
            child: Mutex::new(child),
            link: StreamChannel::new(stdout, stdin, max_frame_bytes),
        })
    }

    /// The controller program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check whether the child has exited, returning its exit code if so.
    pub async fn try_exit_code(&self) -> ChannelResult<Option<i32>> {
        let mut child = self.child.lock().await;
        Ok(child.try_wait()?.map(|status| status.code().unwrap_or(-1)))
    }

    /// Signal the controller to exit without waiting for it.
    ///
    /// Callable from synchronous code. Returns `false` when the child could
    /// not be signalled, for example because it was already reaped or a
    /// concurrent [`shutdown`](Self::shutdown) holds it.
    pub fn start_kill(&self) -> bool {
        match self.child.try_lock() {
            Ok(mut child) => child.start_kill().is_ok(),
            Err(_) => false,
        }
    }

    /// Kill the controller process and wait for it.
    pub async fn shutdown(&self) -> ChannelResult<()> {
        let mut child = self.child.lock().await;
        if child.try_wait()?.is_none() {
            child.kill().await?;
        }
        info!(program = %self.program, "Controller process stopped");
        Ok(())
    }
}

#[async_trait]
impl ControllerChannel for ProcessChannel {
    async fn send(&self, payload: String, ctx: CallContext) -> ChannelResult<String> {
        self.link.send(payload, ctx).await
    }
}
