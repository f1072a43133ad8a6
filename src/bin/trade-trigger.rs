//! Simulated trades on every configured venue, run concurrently.
//!
//! Each venue is a stub: a zero-value transaction to the venue address is
//! built and its hash logged. Nothing is broadcast.

use std::path::PathBuf;

use clap::Parser;

use chain_trigger::lifecycle::startup::bootstrap;
use chain_trigger::trading;

#[derive(Parser)]
#[command(name = "trade-trigger")]
#[command(about = "Run the stub trade on each configured venue concurrently", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level for this program (overridden by RUST_LOG).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Print the configured venues as JSON and exit.
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
        match serde_json::to_string_pretty(&config.venues) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render configuration");
                std::process::exit(1);
            }
        }
        return;
    }

    tracing::info!(
        venues = config.venues.len(),
        "trade-trigger v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    trading::run_all(&config.venues).await;
}
