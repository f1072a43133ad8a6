//! Wallet management and transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::consensus::TxLegacy;
use alloy::network::TxSignerSync;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signature;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Signing credential for one sender.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// Accepts the key with or without a `0x` prefix. The sender address is
    /// derived from the key's public point, so the same key always yields
    /// the same address.
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::KeyParse(format!("invalid key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer })
    }

    /// Load a wallet from the environment variable `var`.
    pub fn from_env(var: &str) -> BlockchainResult<Self> {
        let private_key = std::env::var(var).map_err(|_| {
            BlockchainError::KeyParse(format!("environment variable {} not set", var))
        })?;

        Self::from_private_key(&private_key)
    }

    /// The sender address derived from the key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a legacy transaction.
    ///
    /// When `tx.chain_id` is set the signature follows EIP-155, which binds
    /// it to that chain.
    pub fn sign_legacy(&self, tx: &mut TxLegacy) -> BlockchainResult<Signature> {
        self.signer
            .sign_transaction_sync(tx)
            .map_err(|e| BlockchainError::Sign(e.to_string()))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{TxKind, U256};

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_address_derivation_is_deterministic() {
        let a = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let b = Wallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        let c = Wallet::from_private_key(&format!("  {}\n", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(a.address(), b.address());
        assert_eq!(a.address(), c.address());
    }

    #[test]
    fn test_invalid_private_key() {
        let err = Wallet::from_private_key("invalid_key").unwrap_err();
        assert!(matches!(err, BlockchainError::KeyParse(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_env_var() {
        let err = Wallet::from_env("CHAIN_TRIGGER_TEST_UNSET_KEY").unwrap_err();
        assert!(err.to_string().contains("CHAIN_TRIGGER_TEST_UNSET_KEY"));
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("CHAIN_TRIGGER_TEST_WALLET_KEY", TEST_PRIVATE_KEY);
        let wallet = Wallet::from_env("CHAIN_TRIGGER_TEST_WALLET_KEY").unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let rendered = format!("{:?}", wallet);
        assert!(!rendered.contains(TEST_PRIVATE_KEY));
    }

    #[test]
    fn test_sign_legacy_recovers_sender() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let mut tx = TxLegacy {
            chain_id: Some(1),
            nonce: 0,
            gas_price: 1_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(Address::ZERO),
            value: U256::from(1u64),
            input: Default::default(),
        };

        let signature = wallet.sign_legacy(&mut tx).unwrap();
        let recovered = signature
            .recover_address_from_prehash(&alloy::consensus::SignableTransaction::signature_hash(&tx))
            .unwrap();
        assert_eq!(recovered, wallet.address());
    }
}
