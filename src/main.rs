//! Block watcher.
//!
//! Subscribes to new block headers over a WebSocket endpoint and, on every
//! N-th header (10 by default), sends one signed value transfer. Exits after
//! the first transfer the node accepts.
//!
//! # Architecture Overview
//!
//! ```text
//!   node (ws) ──newHeads──▶ subscription pump ──mpsc<HeadEvent>──▶ BlockWatcher
//!                                                                   │
//!                       Ctrl-C / SIGTERM ──▶ Shutdown ─────────────▶│ select
//!                                                                   ▼
//!                           every N-th header: nonce → gas price → sign → send
//! ```
//!
//! Fatal (exit 1): bad config, connection, private key, subscription.
//! Per-block failures are logged and the watcher waits for the next header.

use std::path::PathBuf;

use clap::Parser;

use chain_trigger::lifecycle::signals::spawn_signal_handler;
use chain_trigger::lifecycle::startup::bootstrap;
use chain_trigger::lifecycle::Shutdown;
use chain_trigger::watcher::{self, WatchOutcome};

#[derive(Parser)]
#[command(name = "block-watcher")]
#[command(about = "Send one transfer after every N new block headers", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level for this program (overridden by RUST_LOG).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match bootstrap(cli.config.as_deref(), cli.log_level.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if cli.print_config {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render configuration");
                std::process::exit(1);
            }
        }
        return;
    }

    tracing::info!("block-watcher v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    match watcher::run(&config.watcher, &shutdown).await {
        Ok(WatchOutcome::Sent { hash, blocks }) => {
            tracing::info!(%hash, blocks, "Goal transaction sent");
        }
        Ok(WatchOutcome::Cancelled) => {
            tracing::info!("Stopped before a transaction was sent");
        }
        Err(e) => {
            tracing::error!(error = %e, "Block watcher failed");
            std::process::exit(1);
        }
    }
}
