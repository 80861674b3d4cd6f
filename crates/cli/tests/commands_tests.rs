//! Tests for commands/mod.rs CLI parsing

use blockbridge_cli::commands::{Cli, Commands};
use blockbridge_cli::{LogFormat, OutputFormat};
use blockbridge_types::Phase;
use clap::{CommandFactory, Parser};
use std::path::Path;

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_init() {
    let cli = Cli::parse_from(["blockbridge", "init", "--dir", "/tmp/test", "--force"]);
    match cli.command {
        Commands::Init(args) => {
            assert_eq!(args.dir.as_deref(), Some(Path::new("/tmp/test")));
            assert!(args.force);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_run() {
    let cli = Cli::parse_from([
        "blockbridge",
        "run",
        "--config",
        "bridge.toml",
        "--blocks",
        "3",
        "--dry-run",
    ]);
    assert_eq!(cli.command.config_path(), Some(Path::new("bridge.toml")));
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.blocks, 3);
            assert!(args.dry_run);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_run_defaults() {
    let cli = Cli::parse_from(["blockbridge", "run"]);
    assert_eq!(cli.command.config_path(), Some(Path::new("blockbridge.toml")));
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.blocks, 10);
            assert!(!args.dry_run);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_encode() {
    let cli = Cli::parse_from([
        "blockbridge",
        "encode",
        "--phase",
        "end",
        "--height",
        "500",
        "--time",
        "1700000000",
        "--storage-port",
        "7",
    ]);
    assert_eq!(cli.command.config_path(), None);
    match cli.command {
        Commands::Encode(args) => {
            assert_eq!(args.phase, Phase::End);
            assert_eq!(args.height, 500);
            assert_eq!(args.time, 1_700_000_000);
            assert_eq!(args.storage_port, 7);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_encode_rejects_unknown_phase() {
    let result = Cli::try_parse_from([
        "blockbridge",
        "encode",
        "--phase",
        "finalize",
        "--height",
        "1",
        "--time",
        "1",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_replay() {
    let cli = Cli::parse_from([
        "blockbridge",
        "replay",
        "--transcript",
        "calls.jsonl",
        "--stop-on-divergence",
    ]);
    match cli.command {
        Commands::Replay(args) => {
            assert_eq!(args.transcript, Path::new("calls.jsonl"));
            assert!(args.stop_on_divergence);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_global_flags() {
    let cli = Cli::parse_from([
        "blockbridge",
        "version",
        "--output",
        "json",
        "-vv",
        "--log-format",
        "compact",
    ]);
    assert_eq!(cli.output, OutputFormat::Json);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.log_format, Some(LogFormat::Compact));
    assert!(matches!(cli.command, Commands::Version));
}
