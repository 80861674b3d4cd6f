//! Block Bridge CLI - Main entry point

use blockbridge_cli::{commands::run_cli, commands::Cli};
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_cli(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
