//! Transaction building and signing.
//!
//! # Responsibilities
//! - Build legacy value transfers from explicit fee parameters
//! - Sign with EIP-155 replay protection and encode for broadcast
//! - Provide the per-chain signing context used by trade venues

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{keccak256, Address, Bytes, TxHash, TxKind, U256};
use alloy::rlp::{Encodable, Header};

use crate::blockchain::types::{BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;

/// Parameters of a plain value transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: Address,
    pub value: U256,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub chain_id: ChainId,
}

impl TransferRequest {
    /// The unsigned legacy transaction for this transfer.
    pub fn to_legacy(&self) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id.0),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: self.value,
            input: Bytes::new(),
        }
    }
}

/// A signed transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransfer {
    pub hash: TxHash,
    pub raw: Bytes,
}

/// Sign a transfer with `wallet` and encode it.
pub fn sign_transfer(wallet: &Wallet, request: &TransferRequest) -> BlockchainResult<SignedTransfer> {
    let mut tx = request.to_legacy();
    let signature = wallet.sign_legacy(&mut tx)?;

    let signed = tx.into_signed(signature);
    let hash = *signed.hash();
    let envelope = TxEnvelope::from(signed);

    Ok(SignedTransfer {
        hash,
        raw: Bytes::from(envelope.encoded_2718()),
    })
}

/// Signing context bound to one chain: credential, chain ID and fee
/// parameters applied to every transaction it builds.
#[derive(Debug, Clone)]
pub struct Transactor {
    wallet: Wallet,
    chain_id: ChainId,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
}

impl Transactor {
    /// Bind `wallet` to `chain_id`. Fees start at zero.
    pub fn new(wallet: Wallet, chain_id: ChainId) -> Self {
        Self {
            wallet,
            chain_id,
            value: U256::ZERO,
            gas_limit: 0,
            gas_price: 0,
        }
    }

    /// The sender address.
    pub fn from(&self) -> Address {
        self.wallet.address()
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Build an unsigned legacy transaction to `to` with empty calldata.
    pub fn build(&self, to: Address, nonce: u64) -> TxLegacy {
        TransferRequest {
            to,
            value: self.value,
            nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            chain_id: self.chain_id,
        }
        .to_legacy()
    }
}

/// Hash identifying an unsigned legacy transaction.
///
/// Keccak of the nine-field legacy RLP list with `v`, `r` and `s` all zero,
/// the hash node clients report for a transaction that was never signed.
/// The chain ID does not take part.
pub fn unsigned_hash(tx: &TxLegacy) -> TxHash {
    let fields: [&dyn Encodable; 9] = [
        &tx.nonce,
        &tx.gas_price,
        &tx.gas_limit,
        &tx.to,
        &tx.value,
        &tx.input,
        &0u8,
        &0u8,
        &0u8,
    ];

    let header = Header {
        list: true,
        payload_length: fields.iter().map(|field| field.length()).sum(),
    };
    let mut out = Vec::with_capacity(header.length_with_payload());
    header.encode(&mut out);
    for field in fields {
        field.encode(&mut out);
    }

    keccak256(out)
}
