//! Transcript replay command.
//!
//! `blockbridge replay` sends every request from a recorded transcript to the
//! configured controller, in order, and compares each outcome with the
//! recording. A deterministic controller must reproduce the transcript
//! exactly.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

use blockbridge_controller::{read_transcript, TranscriptEntry};
use blockbridge_core::ControllerChannel;
use blockbridge_types::{BlockHeight, Phase};

use crate::utils::{
    load_config, print_error, print_info, print_success, print_warning, CliError, CliResult,
    ControllerLink, OutputFormat,
};
use crate::DEFAULT_CONFIG_FILE;

/// Arguments for the replay command
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Transcript to replay
    #[arg(short, long)]
    pub transcript: PathBuf,

    /// Stop at the first divergent call
    #[arg(long)]
    pub stop_on_divergence: bool,
}

/// A call whose live outcome differs from the recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Divergence {
    /// Sequence number of the recorded call
    pub seq: u64,
    /// Phase of the recorded call
    pub phase: Phase,
    /// Height of the recorded call
    pub block_height: BlockHeight,
    /// Recorded outcome
    pub expected: String,
    /// Live outcome
    pub actual: String,
}

/// Result of replaying a transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Calls sent to the controller
    pub replayed: usize,
    /// Calls whose outcome matched
    pub matched: usize,
    /// Calls whose outcome differed
    pub divergences: Vec<Divergence>,
}

/// Execute the replay command
pub async fn execute(args: ReplayArgs, output_format: OutputFormat) -> CliResult<()> {
    let config = load_config(&args.config)?;
    if !args.transcript.exists() {
        return Err(CliError::FileNotFound(args.transcript.display().to_string()));
    }

    let entries = read_transcript(&args.transcript)?;
    print_info(&format!(
        "Replaying {} call(s) from {}",
        entries.len(),
        args.transcript.display()
    ));

    // Never record a replay into the transcript it reads from
    let link = ControllerLink::connect(&config, false, false)?;
    let report = replay_entries(link.channel.as_ref(), &entries, args.stop_on_divergence).await;
    link.shutdown().await?;

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for d in &report.divergences {
                print_warning(&format!(
                    "#{} {} at height {}: expected {}, got {}",
                    d.seq, d.phase, d.block_height, d.expected, d.actual
                ));
            }
            if report.divergences.is_empty() {
                print_success(&format!("All {} call(s) matched", report.matched));
            } else {
                print_error(&format!(
                    "{} of {} call(s) diverged",
                    report.divergences.len(),
                    report.replayed
                ));
            }
        }
    }

    if report.divergences.is_empty() {
        Ok(())
    } else {
        Err(CliError::Divergence(report.divergences.len()))
    }
}

/// Send each recorded request through `channel` and compare outcomes.
pub async fn replay_entries<C>(
    channel: &C,
    entries: &[TranscriptEntry],
    stop_on_divergence: bool,
) -> ReplayReport
where
    C: ControllerChannel + ?Sized,
{
    let mut report = ReplayReport::default();

    for entry in entries {
        let live = channel
            .send(entry.request.clone(), entry.call_context())
            .await;
        report.replayed += 1;

        let expected = describe(entry.outcome());
        let actual = match &live {
            Ok(response) => describe(Ok(response)),
            Err(e) => describe(Err(&e.to_string())),
        };

        if expected == actual {
            debug!(seq = entry.seq, "Replay matched");
            report.matched += 1;
            continue;
        }

        warn!(seq = entry.seq, %expected, %actual, "Replay diverged");
        report.divergences.push(Divergence {
            seq: entry.seq,
            phase: entry.phase,
            block_height: entry.block_height,
            expected,
            actual,
        });
        if stop_on_divergence {
            break;
        }
    }

    report
}

fn describe(outcome: Result<&str, &str>) -> String {
    match outcome {
        Ok(response) => format!("ok {}", response),
        Err(error) => format!("error {}", error),
    }
}
