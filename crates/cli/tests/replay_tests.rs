//! Tests for commands/replay.rs

use async_trait::async_trait;
use blockbridge_cli::commands::replay::replay_entries;
use blockbridge_controller::TranscriptEntry;
use blockbridge_core::{CallContext, ChannelError, ChannelResult, ControllerChannel};
use blockbridge_types::Phase;

/// Echoes the request back, rejecting requests that contain "bad".
struct EchoController;

#[async_trait]
impl ControllerChannel for EchoController {
    async fn send(&self, payload: String, _ctx: CallContext) -> ChannelResult<String> {
        if payload.contains("bad") {
            Err(ChannelError::Rejected("bad request".to_string()))
        } else {
            Ok(payload)
        }
    }
}

fn entry(seq: u64, request: &str, response: Option<&str>, error: Option<&str>) -> TranscriptEntry {
    TranscriptEntry {
        seq,
        phase: Phase::End,
        block_height: seq as i64,
        request: request.to_string(),
        response: response.map(str::to_string),
        error: error.map(str::to_string),
        recorded_at: "2024-01-01T00:00:00+00:00".to_string(),
    }
}

#[tokio::test]
async fn test_matching_transcript() {
    let rejection = ChannelError::Rejected("bad request".to_string()).to_string();
    let entries = vec![
        entry(1, "a", Some("a"), None),
        entry(2, "bad", None, Some(&rejection)),
    ];

    let report = replay_entries(&EchoController, &entries, false).await;
    assert_eq!(report.replayed, 2);
    assert_eq!(report.matched, 2);
    assert!(report.divergences.is_empty());
}

#[tokio::test]
async fn test_divergences_reported() {
    let entries = vec![
        entry(1, "a", Some("b"), None),
        entry(2, "c", Some("c"), None),
        entry(3, "bad", Some("ok"), None),
    ];

    let report = replay_entries(&EchoController, &entries, false).await;
    assert_eq!(report.replayed, 3);
    assert_eq!(report.matched, 1);

    let seqs: Vec<u64> = report.divergences.iter().map(|d| d.seq).collect();
    assert_eq!(seqs, vec![1, 3]);
    assert_eq!(report.divergences[0].expected, "ok b");
    assert_eq!(report.divergences[0].actual, "ok a");
    assert!(report.divergences[1].actual.starts_with("error "));
}

#[tokio::test]
async fn test_stop_on_divergence() {
    let entries = vec![
        entry(1, "a", Some("a"), None),
        entry(2, "b", Some("x"), None),
        entry(3, "c", Some("y"), None),
    ];

    let report = replay_entries(&EchoController, &entries, true).await;
    assert_eq!(report.replayed, 2);
    assert_eq!(report.divergences.len(), 1);
    assert_eq!(report.divergences[0].seq, 2);
}
