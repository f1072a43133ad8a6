//! Block watcher.
//!
//! # Data Flow
//! ```text
//! WatcherConfig
//!     → connect_ws (fatal on failure)
//!     → Wallet::from_env (fatal on failure)
//!     → eth_chainId once (fatal on failure)
//!     → eth_subscribe newHeads (fatal on failure)
//!     → subscription pump → mpsc<HeadEvent>
//!     → BlockWatcher::run (select: head event | cancellation)
//!         every N-th header: nonce → gas price → sign → send
//! ```

pub mod runner;
pub mod state;

use alloy::primitives::utils::parse_ether;
use alloy::primitives::Address;
use thiserror::Error;

use crate::blockchain::subscription::spawn_head_pump;
use crate::blockchain::{BlockchainClient, BlockchainError, Wallet};
use crate::config::WatcherConfig;
use crate::lifecycle::Shutdown;

pub use runner::{BlockWatcher, TransferPlan, WatchOutcome};
pub use state::{BlockCounter, WatcherState};

/// Errors that stop the watcher.
#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("invalid watcher configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Chain(#[from] BlockchainError),
}

impl TransferPlan {
    /// Resolve recipient and value from configuration.
    pub fn from_config(config: &WatcherConfig) -> Result<Self, WatcherError> {
        let recipient: Address = config.recipient.parse().map_err(|e| {
            WatcherError::Config(format!("recipient '{}': {}", config.recipient, e))
        })?;
        let value = parse_ether(&config.transfer_value_eth).map_err(|e| {
            WatcherError::Config(format!(
                "transfer value '{}': {}",
                config.transfer_value_eth, e
            ))
        })?;

        Ok(Self {
            recipient,
            value,
            gas_limit: config.gas_limit,
        })
    }
}

/// Connect, subscribe and run the watch loop to completion.
pub async fn run(config: &WatcherConfig, shutdown: &Shutdown) -> Result<WatchOutcome, WatcherError> {
    let plan = TransferPlan::from_config(config)?;

    let client = BlockchainClient::connect_ws(&config.ws_url, config.rpc_timeout_secs).await?;
    let wallet = Wallet::from_env(&config.private_key_env)?;
    let chain_id = client.get_chain_id().await?;

    tracing::info!(
        endpoint = client.endpoint(),
        chain_id = %chain_id,
        sender = %wallet.address(),
        recipient = %plan.recipient,
        every_n_blocks = config.every_n_blocks,
        "Listening for new blocks..."
    );

    let subscription = client.subscribe_heads().await?;
    let (mut heads, pump) = spawn_head_pump(subscription, config.channel_capacity);

    let mut watcher = BlockWatcher::new(client, wallet, chain_id, plan, config.every_n_blocks);
    let result = watcher.run(&mut heads, &mut shutdown.subscribe()).await;

    pump.abort();
    result.map_err(WatcherError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    #[test]
    fn test_plan_from_default_config() {
        let plan = TransferPlan::from_config(&WatcherConfig::default()).unwrap();
        assert_eq!(plan.value, U256::from(1_000_000_000_000_000u64));
        assert_eq!(plan.gas_limit, 21_000);
        assert_eq!(plan.recipient, Address::ZERO);
    }

    #[test]
    fn test_plan_rejects_bad_recipient() {
        let config = WatcherConfig {
            recipient: "0x1234".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            TransferPlan::from_config(&config),
            Err(WatcherError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_fatal() {
        let config = WatcherConfig {
            ws_url: "ws://127.0.0.1:1".to_string(),
            rpc_timeout_secs: 2,
            ..Default::default()
        };
        let err = run(&config, &Shutdown::new()).await.unwrap_err();
        assert!(matches!(err, WatcherError::Chain(BlockchainError::Connection(_))));
    }
}
