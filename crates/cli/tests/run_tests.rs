//! Tests for commands/run.rs block driving

use std::sync::Arc;

use async_trait::async_trait;
use blockbridge_bridge::{BlockLifecycleBridge, BridgeError, FatalLatch, PortRegistry};
use blockbridge_cli::commands::run::{drive_blocks, execute, RunArgs};
use blockbridge_cli::utils::OutputFormat;
use blockbridge_cli::CliError;
use blockbridge_config::{Config, HostConfig};
use blockbridge_core::{CallContext, ChannelError, ChannelResult, ControllerChannel};
use blockbridge_types::{BlockMeta, Phase};
use parking_lot::Mutex;
use tempfile::tempdir;

/// Records calls; optionally rejects one phase at one height.
#[derive(Default)]
struct ScriptedController {
    calls: Mutex<Vec<CallContext>>,
    reject: Option<CallContext>,
}

#[async_trait]
impl ControllerChannel for ScriptedController {
    async fn send(&self, _payload: String, ctx: CallContext) -> ChannelResult<String> {
        self.calls.lock().push(ctx);
        if self.reject == Some(ctx) {
            return Err(ChannelError::Rejected("scripted failure".to_string()));
        }
        Ok("null".to_string())
    }
}

fn host() -> HostConfig {
    HostConfig {
        start_height: 100,
        genesis_time: 1_700_000_000,
        block_interval_secs: 5,
        pause_ms: 0,
    }
}

fn bridge(
    controller: Arc<ScriptedController>,
) -> (
    BlockLifecycleBridge<ScriptedController, PortRegistry>,
    Arc<FatalLatch>,
) {
    let ports = Arc::new(PortRegistry::new());
    ports.register("storage").unwrap();
    let latch = Arc::new(FatalLatch::new());
    let bridge = BlockLifecycleBridge::new(controller, ports, latch.clone());
    (bridge, latch)
}

#[tokio::test]
async fn test_drive_blocks_runs_all_phases_in_order() {
    let controller = Arc::new(ScriptedController::default());
    let (bridge, latch) = bridge(controller.clone());

    let summary = drive_blocks(&bridge, &host(), 3).await.unwrap();
    assert_eq!(summary.blocks, 3);
    assert_eq!(summary.first_height, Some(100));
    assert_eq!(summary.last_end, BlockMeta::new(102, 1_700_000_010));
    assert!(!latch.is_tripped());

    let calls = controller.calls.lock().clone();
    let expected: Vec<CallContext> = (100..103)
        .flat_map(|h| Phase::ALL.iter().map(move |p| CallContext::new(*p, h)))
        .collect();
    assert_eq!(calls, expected);
}

#[tokio::test]
async fn test_drive_zero_blocks() {
    let controller = Arc::new(ScriptedController::default());
    let (bridge, _latch) = bridge(controller.clone());

    let summary = drive_blocks(&bridge, &host(), 0).await.unwrap();
    assert_eq!(summary.blocks, 0);
    assert_eq!(summary.first_height, None);
    assert_eq!(summary.last_end, BlockMeta::ZERO);
    assert!(controller.calls.lock().is_empty());
}

#[tokio::test]
async fn test_begin_failure_stops_run() {
    let controller = Arc::new(ScriptedController {
        reject: Some(CallContext::new(Phase::Begin, 101)),
        ..Default::default()
    });
    let (bridge, latch) = bridge(controller.clone());

    let err = drive_blocks(&bridge, &host(), 5).await.unwrap_err();
    assert!(matches!(err, CliError::Bridge(BridgeError::Channel { phase: Phase::Begin, .. })));
    assert!(!latch.is_tripped());
    assert_eq!(bridge.bridge_state().meta(), BlockMeta::new(100, 1_700_000_000));
    assert_eq!(controller.calls.lock().len(), 4);
}

#[tokio::test]
async fn test_end_failure_is_fatal() {
    let controller = Arc::new(ScriptedController {
        reject: Some(CallContext::new(Phase::End, 100)),
        ..Default::default()
    });
    let (bridge, latch) = bridge(controller.clone());

    let err = drive_blocks(&bridge, &host(), 2).await.unwrap_err();
    match err {
        CliError::Bridge(e) => assert!(e.is_fatal()),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(latch.count(), 1);
    assert_eq!(controller.calls.lock().len(), 2);
}

#[tokio::test]
async fn test_execute_dry_run_with_transcript() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("blockbridge.toml");
    let transcript = dir.path().join("calls.jsonl");

    let mut config = Config::default();
    config.transcript.enabled = true;
    config.transcript.path = transcript.clone();
    config.save(&config_path).unwrap();

    let args = RunArgs {
        config: config_path,
        blocks: 2,
        dry_run: true,
    };
    execute(args, OutputFormat::Json).await.unwrap();

    let entries = blockbridge_controller::read_transcript(&transcript).unwrap();
    let phases: Vec<Phase> = entries.iter().map(|e| e.phase).collect();
    assert_eq!(
        phases,
        vec![
            Phase::Begin,
            Phase::End,
            Phase::Commit,
            Phase::Begin,
            Phase::End,
            Phase::Commit
        ]
    );
    assert_eq!(
        entries[5].request,
        r#"{"type":"COMMIT_BLOCK","blockHeight":2,"blockTime":1700000005}"#
    );
}

#[tokio::test]
async fn test_execute_missing_config() {
    let dir = tempdir().unwrap();
    let args = RunArgs {
        config: dir.path().join("absent.toml"),
        blocks: 1,
        dry_run: true,
    };
    let result = execute(args, OutputFormat::Text).await;
    assert!(matches!(result, Err(CliError::FileNotFound(_))));
}
