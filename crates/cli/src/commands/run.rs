//! Block production command.
//!
//! This module handles the `blockbridge run` command. It plays the part of a
//! consensus host: for each simulated block it calls begin, end and commit on
//! a [`BlockLifecycleBridge`] connected to the configured controller.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use blockbridge_bridge::{AbortProcess, BlockLifecycleBridge};
use blockbridge_config::HostConfig;
use blockbridge_core::{ControllerChannel, PortResolver};
use blockbridge_types::{BeginBlockRequest, BlockHeight, BlockMeta, EndBlockRequest};

use crate::utils::{
    load_config, port_registry, print_info, print_success, CliError, CliResult, ControllerLink,
    OutputFormat,
};
use crate::DEFAULT_CONFIG_FILE;

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Number of blocks to produce
    #[arg(short, long, default_value = "10")]
    pub blocks: u64,

    /// Log actions instead of sending them to the controller
    #[arg(long)]
    pub dry_run: bool,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Blocks that went through all three phases
    pub blocks: u64,
    /// Height of the first block
    pub first_height: Option<BlockHeight>,
    /// Height and time recorded by the last end block
    pub last_end: BlockMeta,
}

/// Execute the run command
pub async fn execute(args: RunArgs, output_format: OutputFormat) -> CliResult<()> {
    let config = load_config(&args.config)?;

    let ports = Arc::new(port_registry(&config)?);
    let link = ControllerLink::connect(&config, args.dry_run, true)?;
    let bridge = BlockLifecycleBridge::new(
        Arc::clone(&link.channel),
        ports,
        link.fatal_handler(Arc::new(AbortProcess)),
    );

    print_info(&format!(
        "Running {} block(s) against {}",
        args.blocks,
        if args.dry_run {
            "dry-run".to_string()
        } else {
            config.controller.describe()
        }
    ));

    let outcome = drive_blocks(&bridge, &config.host, args.blocks).await;
    link.shutdown().await?;
    let summary = outcome?;

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            print_success(&format!("Completed {} block(s)", summary.blocks));
            if let Some(first) = summary.first_height {
                println!("  First Height: {}", first);
            }
            println!("  Last End:     {}", summary.last_end);
        }
    }

    Ok(())
}

/// Run `blocks` consecutive blocks through `bridge`, following `host`'s schedule.
///
/// Stops at the first error. A begin failure is returned as-is; end and commit
/// failures have already been handed to the bridge's fatal handler.
pub async fn drive_blocks<C, P>(
    bridge: &BlockLifecycleBridge<C, P>,
    host: &HostConfig,
    blocks: u64,
) -> CliResult<RunSummary>
where
    C: ControllerChannel + ?Sized,
    P: PortResolver + ?Sized,
{
    let mut summary = RunSummary {
        blocks: 0,
        first_height: None,
        last_end: BlockMeta::ZERO,
    };

    for index in 0..blocks {
        let ctx = host.block_at(index).ok_or_else(|| {
            CliError::InvalidArgument(format!("block {} is outside the representable range", index))
        })?;
        debug!(height = ctx.height, "Producing block");

        bridge
            .on_block_begin(&ctx, &BeginBlockRequest::default())
            .await?;
        bridge
            .on_block_end(&ctx, &EndBlockRequest::new(ctx.height))
            .await?;
        bridge.on_block_commit().await?;

        summary.blocks += 1;
        summary.first_height.get_or_insert(ctx.height);
        summary.last_end = bridge.bridge_state().meta();

        if host.pause_ms > 0 && index + 1 < blocks {
            tokio::time::sleep(Duration::from_millis(host.pause_ms)).await;
        }
    }

    info!(blocks = summary.blocks, last_end = %summary.last_end, "Run finished");
    Ok(summary)
}
