//! adversim - adversary emulation agent
//! Runs an adversary profile against the local host, or replays its cleanup

mod banner;
mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use adversim_core::application::stop_channel;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = logging::init(cli.log_level, cli.log_file.as_deref())?;
    info!("adversim v{} starting...", adversim_core::VERSION);

    let (stop_tx, stop) = stop_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Stop signal received, finishing the current link...");
            stop_tx.stop();
        }
    });

    match cli.command.unwrap_or(Commands::Run(cli.run)) {
        Commands::Run(args) => commands::run(args, stop).await,
        Commands::Cleanup(args) => commands::cleanup(args, stop).await,
    }
}
