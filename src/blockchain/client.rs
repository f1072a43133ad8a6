//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to a JSON-RPC endpoint (HTTP request/response or WebSocket)
//! - Query chain state (chain ID, pending nonce, gas price)
//! - Broadcast signed transactions
//! - Map each failure onto the operation's error variant

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use alloy::pubsub::Subscription;
use alloy::rpc::types::Header;
use alloy::transports::TransportResult;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};

/// Chain operations the block watcher needs once it is running.
///
/// Implemented by [`BlockchainClient`]; tests substitute their own.
pub trait TransferChain: Send + Sync {
    /// Next nonce for `address`, counting pending transactions.
    fn pending_nonce(&self, address: Address)
        -> impl Future<Output = BlockchainResult<u64>> + Send;

    /// Network-suggested gas price in wei.
    fn gas_price(&self) -> impl Future<Output = BlockchainResult<u128>> + Send;

    /// Broadcast an EIP-2718 encoded signed transaction.
    fn send_raw_transaction(&self, raw: &[u8])
        -> impl Future<Output = BlockchainResult<TxHash>> + Send;
}

/// RPC client wrapper for a single endpoint.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    endpoint: String,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a request/response client.
    ///
    /// HTTP providers connect lazily, so this only fails on a malformed URL.
    pub fn connect_http(endpoint: &str, timeout_secs: u64) -> BlockchainResult<Self> {
        let url: url::Url = endpoint.parse().map_err(|e| {
            BlockchainError::Connection(format!("invalid RPC URL '{}': {}", endpoint, e))
        })?;

        let provider = ProviderBuilder::new().connect_http(url);

        tracing::debug!(endpoint = %endpoint, "HTTP client created");

        Ok(Self {
            provider: Arc::new(provider) as Arc<dyn Provider + Send + Sync>,
            endpoint: endpoint.to_string(),
            timeout_duration: Duration::from_secs(timeout_secs),
        })
    }

    /// Dial a streaming (WebSocket) endpoint.
    pub async fn connect_ws(endpoint: &str, timeout_secs: u64) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(timeout_secs);
        let connect = ProviderBuilder::new().connect_ws(WsConnect::new(endpoint));

        let provider = match timeout(timeout_duration, connect).await {
            Ok(Ok(provider)) => provider,
            Ok(Err(e)) => {
                return Err(BlockchainError::Connection(format!(
                    "failed to connect to {}: {}",
                    endpoint, e
                )))
            }
            Err(_) => {
                return Err(BlockchainError::Connection(format!(
                    "connecting to {} timed out after {}s",
                    endpoint, timeout_secs
                )))
            }
        };

        tracing::info!(endpoint = %endpoint, "WebSocket client connected");

        Ok(Self {
            provider: Arc::new(provider) as Arc<dyn Provider + Send + Sync>,
            endpoint: endpoint.to_string(),
            timeout_duration,
        })
    }

    /// Connect by URL scheme: `ws`/`wss` dial a socket, anything else is HTTP.
    pub async fn connect(endpoint: &str, timeout_secs: u64) -> BlockchainResult<Self> {
        if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
            Self::connect_ws(endpoint, timeout_secs).await
        } else {
            Self::connect_http(endpoint, timeout_secs)
        }
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.call("eth_chainId", self.provider.get_chain_id(), BlockchainError::Connection)
            .await
            .map(ChainId)
    }

    /// Open a `newHeads` subscription. Requires a streaming endpoint.
    pub async fn subscribe_heads(&self) -> BlockchainResult<Subscription<Header>> {
        self.call(
            "eth_subscribe",
            self.provider.subscribe_blocks(),
            BlockchainError::Subscription,
        )
        .await
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<F, T>(
        &self,
        method: &'static str,
        request: F,
        into_error: fn(String) -> BlockchainError,
    ) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        match timeout(self.timeout_duration, request).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::debug!(endpoint = %self.endpoint, method, error = %e, "RPC error");
                Err(into_error(e.to_string()))
            }
            Err(_) => {
                tracing::debug!(endpoint = %self.endpoint, method, "RPC timeout");
                Err(into_error(format!(
                    "{} timed out after {}s",
                    method,
                    self.timeout_duration.as_secs()
                )))
            }
        }
    }
}

impl TransferChain for BlockchainClient {
    async fn pending_nonce(&self, address: Address) -> BlockchainResult<u64> {
        self.call(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
            BlockchainError::NonceFetch,
        )
        .await
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.call("eth_gasPrice", self.provider.get_gas_price(), BlockchainError::GasPriceFetch)
            .await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash> {
        let pending = self
            .call(
                "eth_sendRawTransaction",
                self.provider.send_raw_transaction(raw),
                BlockchainError::Send,
            )
            .await?;
        Ok(*pending.tx_hash())
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_http_url() {
        let err = BlockchainClient::connect_http("not a url", 5).unwrap_err();
        assert!(matches!(err, BlockchainError::Connection(_)));
    }

    #[tokio::test]
    async fn test_http_client_is_lazy() {
        // Nothing listens here; creation must still succeed.
        let client = BlockchainClient::connect_http("http://127.0.0.1:1", 1).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:1");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_maps_to_operation_error() {
        let client = BlockchainClient::connect_http("http://127.0.0.1:1", 2).unwrap();

        let err = client.gas_price().await.unwrap_err();
        assert!(matches!(err, BlockchainError::GasPriceFetch(_)));

        let err = client.pending_nonce(Address::ZERO).await.unwrap_err();
        assert!(matches!(err, BlockchainError::NonceFetch(_)));

        let err = client.get_chain_id().await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_ws_connect_failure_is_fatal() {
        let err = BlockchainClient::connect_ws("ws://127.0.0.1:1", 2)
            .await
            .unwrap_err();
        assert!(matches!(err, BlockchainError::Connection(_)));
        assert!(err.is_fatal());
    }
}
