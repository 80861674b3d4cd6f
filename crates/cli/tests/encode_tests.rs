//! Tests for commands/encode.rs

use blockbridge_cli::commands::encode::{execute, EncodeArgs};
use blockbridge_cli::utils::OutputFormat;
use blockbridge_types::Phase;

fn args(phase: Phase) -> EncodeArgs {
    EncodeArgs {
        phase,
        height: 500,
        time: 1_700_000_000,
        storage_port: 7,
    }
}

#[test]
fn test_encode_begin() {
    assert_eq!(
        args(Phase::Begin).action().encode().unwrap(),
        r#"{"type":"BEGIN_BLOCK","storagePort":7,"blockHeight":500,"blockTime":1700000000}"#
    );
}

#[test]
fn test_encode_end() {
    assert_eq!(
        args(Phase::End).action().encode().unwrap(),
        r#"{"type":"END_BLOCK","storagePort":7,"blockHeight":500,"blockTime":1700000000}"#
    );
}

#[test]
fn test_encode_commit_ignores_storage_port() {
    assert_eq!(
        args(Phase::Commit).action().encode().unwrap(),
        r#"{"type":"COMMIT_BLOCK","blockHeight":500,"blockTime":1700000000}"#
    );
}

#[test]
fn test_execute_both_formats() {
    assert!(execute(args(Phase::End), OutputFormat::Text).is_ok());
    assert!(execute(args(Phase::End), OutputFormat::Json).is_ok());
}
