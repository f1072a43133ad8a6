//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for both
//! binaries. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration shared by `block-watcher` and `trade-trigger`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Block watcher settings.
    pub watcher: WatcherConfig,

    /// Trade venues, one concurrent unit each.
    pub venues: Vec<VenueConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watcher: WatcherConfig::default(),
            venues: default_venues(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Block watcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Streaming JSON-RPC endpoint (ws:// or wss://).
    pub ws_url: String,

    /// Environment variable holding the sender's private key.
    pub private_key_env: String,

    /// Recipient of the transfer.
    pub recipient: String,

    /// A transfer is attempted on every header whose count is a multiple of this.
    pub every_n_blocks: u64,

    /// Transfer value in ether (decimal string, e.g. "0.001").
    pub transfer_value_eth: String,

    /// Gas limit for the transfer. 21000 is the minimum for a plain transfer.
    pub gas_limit: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Buffer size between the subscription and the watch loop.
    pub channel_capacity: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://localhost:8546".to_string(),
            private_key_env: "WATCHER_PRIVATE_KEY".to_string(),
            // Placeholder: set the real recipient in the config file.
            recipient: "0x0000000000000000000000000000000000000000".to_string(),
            every_n_blocks: 10,
            transfer_value_eth: "0.001".to_string(),
            gas_limit: 21_000,
            rpc_timeout_secs: 10,
            channel_capacity: 64,
        }
    }
}

/// A single trade venue.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VenueConfig {
    /// Venue identifier for logging/metrics.
    pub name: String,

    /// JSON-RPC endpoint URL of the chain hosting the venue.
    pub rpc_url: String,

    /// Chain ID the signing context is bound to.
    pub chain_id: u64,

    /// Environment variable holding this venue's private key.
    pub private_key_env: String,

    /// Router or pool address the stub transaction is addressed to.
    pub target: String,

    /// Token sold.
    pub from_token: String,

    /// Token bought.
    pub to_token: String,

    /// Amount of `from_token` in its smallest unit.
    #[serde(default = "default_amount_in")]
    pub amount_in: u64,

    /// Gas limit attached to the stub transaction.
    #[serde(default = "default_venue_gas_limit")]
    pub gas_limit: u64,

    /// RPC request timeout in seconds.
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,
}

fn default_amount_in() -> u64 {
    1_000_000 // 1 USDC (6 decimals)
}

fn default_venue_gas_limit() -> u64 {
    300_000
}

fn default_rpc_timeout_secs() -> u64 {
    10
}

const USDC_SEPOLIA: &str = "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238";
const USDT_SEPOLIA: &str = "0x30fA2FbE15c1EaDfbEF28C188b7B8dbd3c1Ff2eB";

fn default_venues() -> Vec<VenueConfig> {
    vec![
        VenueConfig {
            name: "uniswap".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 1,
            private_key_env: "UNISWAP_PRIVATE_KEY".to_string(),
            target: "0x3fC91A3afd70395Cd496C647d5a6CC9D4B2b7FAD".to_string(),
            from_token: USDC_SEPOLIA.to_string(),
            to_token: USDT_SEPOLIA.to_string(),
            amount_in: default_amount_in(),
            gas_limit: default_venue_gas_limit(),
            rpc_timeout_secs: default_rpc_timeout_secs(),
        },
        VenueConfig {
            name: "curve".to_string(),
            rpc_url: "http://localhost:8547".to_string(),
            chain_id: 421_613,
            private_key_env: "CURVE_PRIVATE_KEY".to_string(),
            target: "0x654273fbe9445549D4B3817bb50375717894C49B".to_string(),
            from_token: USDT_SEPOLIA.to_string(),
            to_token: USDC_SEPOLIA.to_string(),
            amount_in: default_amount_in(),
            gas_limit: default_venue_gas_limit(),
            rpc_timeout_secs: default_rpc_timeout_secs(),
        },
    ]
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
