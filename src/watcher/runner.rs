//! The block watcher event loop.

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, TxHash, U256};
use tokio::sync::mpsc;

use crate::blockchain::transaction::{sign_transfer, SignedTransfer, TransferRequest};
use crate::blockchain::{BlockchainError, BlockchainResult, ChainId, HeadEvent, TransferChain, Wallet};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::watcher::state::{BlockCounter, WatcherState};

/// What the watcher sends once a qualifying block arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub recipient: Address,
    pub value: U256,
    pub gas_limit: u64,
}

/// How a watch loop ended without a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The transfer was accepted by the node after `blocks` headers.
    Sent { hash: TxHash, blocks: u64 },
    /// Cancelled before a transfer succeeded.
    Cancelled,
}

/// Counts headers and sends one transfer on the first qualifying block
/// where every step succeeds.
pub struct BlockWatcher<C> {
    chain: C,
    wallet: Wallet,
    chain_id: ChainId,
    plan: TransferPlan,
    counter: BlockCounter,
    state: WatcherState,
    finished: Option<WatchOutcome>,
}

impl<C: TransferChain> BlockWatcher<C> {
    pub fn new(
        chain: C,
        wallet: Wallet,
        chain_id: ChainId,
        plan: TransferPlan,
        every_n_blocks: u64,
    ) -> Self {
        Self {
            chain,
            wallet,
            chain_id,
            plan,
            counter: BlockCounter::new(every_n_blocks),
            state: WatcherState::WaitingForHeader,
            finished: None,
        }
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// Headers processed so far.
    pub fn blocks_seen(&self) -> u64 {
        self.counter.count()
    }

    /// Run until a transfer is sent, the subscription fails, or `shutdown` fires.
    /// Once a transfer has been sent, later calls return the same outcome
    /// without reading any header.
    ///
    /// A subscription error, or the head channel closing, is returned as
    /// [`BlockchainError::Subscription`]. Per-block failures are logged and
    /// the loop waits for the next header.
    pub async fn run(
        &mut self,
        heads: &mut mpsc::Receiver<HeadEvent>,
        shutdown: &mut ShutdownSignal,
    ) -> BlockchainResult<WatchOutcome> {
        if let Some(outcome) = &self.finished {
            return Ok(outcome.clone());
        }

        loop {
            self.transition(WatcherState::WaitingForHeader);

            let event = tokio::select! {
                biased;
                _ = shutdown.triggered() => {
                    tracing::info!(blocks = self.counter.count(), "Block watcher cancelled");
                    return Ok(WatchOutcome::Cancelled);
                }
                event = heads.recv() => event,
            };

            let head = match event {
                Some(HeadEvent::Header(head)) => head,
                Some(HeadEvent::Skipped(n)) => {
                    let missed = self.counter.skip(n);
                    tracing::warn!(skipped = n, count = self.counter.count(), "Headers dropped before they were read");
                    if missed {
                        tracing::warn!(
                            interval = self.counter.interval(),
                            "A qualifying block was among the dropped headers, waiting for the next one"
                        );
                    }
                    continue;
                }
                Some(HeadEvent::Error(reason)) => return Err(BlockchainError::Subscription(reason)),
                None => {
                    return Err(BlockchainError::Subscription(
                        "head stream ended".to_string(),
                    ))
                }
            };

            self.transition(WatcherState::Counting);
            let due = self.counter.record();
            metrics::record_block();
            tracing::info!(hash = %head.hash, count = self.counter.count(), "New block: {}", head.number);

            if !due {
                continue;
            }

            self.transition(WatcherState::AttemptingSend);
            tracing::info!(
                "Attempting to send {} ETH from {} to {}",
                format_ether(self.plan.value),
                self.wallet.address(),
                self.plan.recipient
            );

            match self.attempt_transfer().await {
                Ok(signed) => {
                    metrics::record_transfer_attempt("sent");
                    tracing::info!("Transaction sent: {}", signed.hash);
                    tracing::info!(
                        "Transaction completed after {} blocks, exiting",
                        self.counter.count()
                    );
                    self.transition(WatcherState::Done);
                    let outcome = WatchOutcome::Sent {
                        hash: signed.hash,
                        blocks: self.counter.count(),
                    };
                    self.finished = Some(outcome.clone());
                    return Ok(outcome);
                }
                Err(e) => {
                    metrics::record_transfer_attempt(failure_step(&e));
                    tracing::warn!(block = head.number, error = %e, "Transfer attempt failed");
                }
            }
        }
    }

    async fn attempt_transfer(&self) -> BlockchainResult<SignedTransfer> {
        let nonce = self.chain.pending_nonce(self.wallet.address()).await?;
        let gas_price = self.chain.gas_price().await?;

        let request = TransferRequest {
            to: self.plan.recipient,
            value: self.plan.value,
            nonce,
            gas_price,
            gas_limit: self.plan.gas_limit,
            chain_id: self.chain_id,
        };
        let signed = sign_transfer(&self.wallet, &request)?;

        let node_hash = self.chain.send_raw_transaction(&signed.raw).await?;
        if node_hash != signed.hash {
            tracing::warn!(local = %signed.hash, node = %node_hash, "Node reported a different transaction hash");
        }

        Ok(signed)
    }

    fn transition(&mut self, next: WatcherState) {
        if self.state != next {
            tracing::debug!(from = %self.state, to = %next, "Watcher state change");
            self.state = next;
        }
    }
}

fn failure_step(error: &BlockchainError) -> &'static str {
    match error {
        BlockchainError::NonceFetch(_) => "nonce",
        BlockchainError::GasPriceFetch(_) => "gas_price",
        BlockchainError::Sign(_) => "sign",
        BlockchainError::Send(_) => "send",
        _ => "other",
    }
}
