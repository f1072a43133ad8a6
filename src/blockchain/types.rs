//! Chain-specific types and error definitions.

use alloy::primitives::B256;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fields of a new-head notification the watcher cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadNotice {
    pub number: u64,
    pub hash: B256,
}

/// One event from a head subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadEvent {
    Header(HeadNotice),
    /// The local buffer overflowed and this many headers were dropped
    /// before they could be read.
    Skipped(u64),
    /// The subscription failed; no further headers will arrive.
    Error(String),
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Dialing the endpoint or a startup query failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid private key format or missing key.
    #[error("Invalid private key: {0}")]
    KeyParse(String),

    /// Head subscription could not be created or broke.
    #[error("Subscription error: {0}")]
    Subscription(String),

    #[error("Failed to get nonce: {0}")]
    NonceFetch(String),

    #[error("Failed to get gas price: {0}")]
    GasPriceFetch(String),

    #[error("Failed to sign transaction: {0}")]
    Sign(String),

    #[error("Failed to send transaction: {0}")]
    Send(String),
}

impl BlockchainError {
    /// Whether the block watcher must stop when it sees this error.
    ///
    /// Per-block failures (nonce, gas price, signing, sending) are logged and
    /// the watcher waits for the next header.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BlockchainError::Connection(_)
                | BlockchainError::KeyParse(_)
                | BlockchainError::Subscription(_)
        )
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
