//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key)
//!     → wallet.rs (key loading, address derivation, signing)
//!     → client.rs (RPC connection with timeouts)
//!     → subscription.rs (newHeads → HeadEvent channel)
//!     → transaction.rs (build, sign, encode)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod subscription;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{BlockchainClient, TransferChain};
pub use transaction::{sign_transfer, SignedTransfer, Transactor, TransferRequest};
pub use types::{BlockchainError, BlockchainResult, ChainId, HeadEvent, HeadNotice};
pub use wallet::Wallet;
