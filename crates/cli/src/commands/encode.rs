//! Action encoding command.
//!
//! `blockbridge encode` prints the exact JSON the bridge would send for one
//! lifecycle action, which is handy when writing or debugging a controller.

use blockbridge_types::{BlockHeight, BlockMeta, BlockTime, Phase, PhaseAction, StoragePort};
use clap::Parser;

use crate::utils::{CliResult, OutputFormat};

/// Arguments for the encode command
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// Lifecycle phase (begin, end, commit)
    #[arg(long)]
    pub phase: Phase,

    /// Block height
    #[arg(long)]
    pub height: BlockHeight,

    /// Block time in Unix seconds
    #[arg(long)]
    pub time: BlockTime,

    /// Storage port (ignored for commit)
    #[arg(long, default_value = "1")]
    pub storage_port: StoragePort,
}

impl EncodeArgs {
    /// The action described by these arguments.
    pub fn action(&self) -> PhaseAction {
        let meta = BlockMeta::new(self.height, self.time);
        match self.phase {
            Phase::Begin => PhaseAction::begin_block(self.storage_port, meta),
            Phase::End => PhaseAction::end_block(self.storage_port, meta),
            Phase::Commit => PhaseAction::commit_block(meta),
        }
    }
}

/// Execute the encode command
pub fn execute(args: EncodeArgs, output_format: OutputFormat) -> CliResult<()> {
    let wire = args.action().encode()?;

    match output_format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "phase": args.phase.tag(),
                "wire": wire,
                "bytes": wire.len(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{}", wire);
        }
    }

    Ok(())
}
