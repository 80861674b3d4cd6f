//! Tests for the child process channel, using `sh` as a stand-in controller.

use std::time::Duration;

use blockbridge_controller::{ProcessChannel, DEFAULT_MAX_FRAME_BYTES};
use blockbridge_core::{CallContext, ChannelError, ControllerChannel};
use blockbridge_types::Phase;

fn shell(script: &str) -> ProcessChannel {
    ProcessChannel::spawn(
        "sh",
        &["-c".to_string(), script.to_string()],
        DEFAULT_MAX_FRAME_BYTES,
    )
    .unwrap()
}

async fn wait_for_exit(process: &ProcessChannel) -> i32 {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(code) = process.try_exit_code().await.unwrap() {
                return code;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn test_round_trip_through_child() {
    // Consumes the 7-byte request frame "4:ping," and answers once.
    let process = shell(r#"head -c 7 >/dev/null; printf '%s' '27:{"ok":true,"result":"pong"},'"#);
    assert_eq!(process.program(), "sh");

    let reply = process
        .send("ping".to_string(), CallContext::new(Phase::Begin, 1))
        .await
        .unwrap();
    assert_eq!(reply, "\"pong\"");

    assert_eq!(wait_for_exit(&process).await, 0);
    let err = process
        .send("ping".to_string(), CallContext::new(Phase::End, 1))
        .await
        .unwrap_err();
    assert_eq!(err, ChannelError::Closed);

    process.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_kills_running_child() {
    let process = shell("exec sleep 30");
    assert_eq!(process.try_exit_code().await.unwrap(), None);

    process.shutdown().await.unwrap();
    assert_eq!(process.try_exit_code().await.unwrap(), Some(-1));
    assert!(!process.start_kill());
}

#[tokio::test]
async fn test_start_kill_signals_child() {
    let process = shell("exec sleep 30");
    assert!(process.start_kill());
    assert_eq!(wait_for_exit(&process).await, -1);
}

#[tokio::test]
async fn test_missing_program_is_io_error() {
    let result = ProcessChannel::spawn(
        "/nonexistent/blockbridge-controller",
        &[],
        DEFAULT_MAX_FRAME_BYTES,
    );
    assert!(matches!(result, Err(ChannelError::Io(_))));
}

#[tokio::test]
async fn test_exited_controller_closes_channel() {
    let process = shell("exit 3");
    assert_eq!(wait_for_exit(&process).await, 3);

    let err = process
        .send("ping".to_string(), CallContext::new(Phase::Commit, 2))
        .await
        .unwrap_err();
    assert_eq!(err, ChannelError::Closed);
}
