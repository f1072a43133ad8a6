//! One simulated venue trade.
//!
//! The trade is a stub: it prepares a signing context and a zero-value,
//! empty-calldata transaction to the venue address, then reports its hash.
//! No swap is encoded and nothing is broadcast.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

use crate::blockchain::transaction::unsigned_hash;
use crate::blockchain::{BlockchainClient, BlockchainError, ChainId, Transactor, TransferChain, Wallet};
use crate::config::VenueConfig;

/// Why a venue unit ended early.
#[derive(Debug, Error)]
pub enum TradeError {
    #[error("invalid venue configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Chain(#[from] BlockchainError),
}

/// Result of a simulated trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubTrade {
    pub venue: String,
    pub chain_id: ChainId,
    pub sender: Address,
    pub target: Address,
    pub gas_price: u128,
    pub hash: TxHash,
}

/// Venue addresses resolved from configuration.
#[derive(Debug, Clone, Copy)]
struct VenueAddresses {
    target: Address,
    from_token: Address,
    to_token: Address,
}

impl VenueAddresses {
    fn resolve(venue: &VenueConfig) -> Result<Self, TradeError> {
        let parse = |field: &str, value: &str| {
            value
                .parse::<Address>()
                .map_err(|e| TradeError::Config(format!("{} '{}': {}", field, value, e)))
        };

        Ok(Self {
            target: parse("target", &venue.target)?,
            from_token: parse("from_token", &venue.from_token)?,
            to_token: parse("to_token", &venue.to_token)?,
        })
    }
}

/// Run the stub trade for `venue`: connect, load the key, bind a signing
/// context to the venue's chain, price gas and hash the stub transaction.
pub async fn simulate_trade(venue: &VenueConfig) -> Result<StubTrade, TradeError> {
    let addresses = VenueAddresses::resolve(venue)?;

    let client = BlockchainClient::connect(&venue.rpc_url, venue.rpc_timeout_secs).await?;
    let wallet = Wallet::from_env(&venue.private_key_env)?;

    let mut transactor = Transactor::new(wallet, ChainId(venue.chain_id));
    transactor.gas_limit = venue.gas_limit;
    transactor.gas_price = client.gas_price().await?;

    tracing::info!(
        venue = %venue.name,
        "Simulated trading {} of {} to {} on {}",
        venue.amount_in,
        addresses.from_token,
        addresses.to_token,
        venue.name
    );

    let tx = transactor.build(addresses.target, 0);
    let hash = unsigned_hash(&tx);

    tracing::info!(venue = %venue.name, "Transaction hash: {}", hash);

    Ok(StubTrade {
        venue: venue.name.clone(),
        chain_id: transactor.chain_id(),
        sender: transactor.from(),
        target: addresses.target,
        gas_price: transactor.gas_price,
        hash,
    })
}
