//! New-head subscription pump.
//!
//! Forwards an alloy `newHeads` subscription into a bounded channel of
//! [`HeadEvent`]s so the watch loop waits on a single receiver. Headers lost
//! to a lagging receiver are reported as `HeadEvent::Skipped` so they still
//! count. A closed subscription becomes one `HeadEvent::Error` followed by
//! channel close.

use alloy::pubsub::Subscription;
use alloy::rpc::types::Header;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::blockchain::types::{HeadEvent, HeadNotice};

impl From<&Header> for HeadNotice {
    fn from(header: &Header) -> Self {
        Self {
            number: header.inner.number,
            hash: header.hash,
        }
    }
}

/// Spawn a task pumping `subscription` into a channel of `capacity` events.
pub fn spawn_head_pump(
    mut subscription: Subscription<Header>,
    capacity: usize,
) -> (mpsc::Receiver<HeadEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(capacity);

    let handle = tokio::spawn(async move {
        loop {
            let event = match subscription.recv().await {
                Ok(header) => HeadEvent::Header(HeadNotice::from(&header)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Head subscription lagged, headers dropped");
                    HeadEvent::Skipped(skipped)
                }
                Err(RecvError::Closed) => {
                    HeadEvent::Error("subscription closed by the node".to_string())
                }
            };

            let terminal = matches!(event, HeadEvent::Error(_));
            if tx.send(event).await.is_err() {
                tracing::debug!("Head receiver dropped, stopping pump");
                break;
            }
            if terminal {
                break;
            }
        }
    });

    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::consensus::Header as ConsensusHeader;
    use alloy::primitives::B256;
    use alloy::pubsub::RawSubscription;
    use serde_json::value::{to_raw_value, RawValue};
    use std::time::Duration;
    use tokio::sync::broadcast;

    fn header(number: u64) -> Header {
        Header::new(ConsensusHeader {
            number,
            ..Default::default()
        })
    }

    /// A subscription fed from a local broadcast channel, the way the
    /// pubsub frontend fans out `eth_subscription` notifications.
    fn subscription(capacity: usize) -> (broadcast::Sender<Box<RawValue>>, Subscription<Header>) {
        let (tx, rx) = broadcast::channel(capacity);
        let raw = RawSubscription {
            rx,
            local_id: B256::with_last_byte(1),
        };
        (tx, Subscription::from(raw))
    }

    fn notify(tx: &broadcast::Sender<Box<RawValue>>, header: &Header) {
        tx.send(to_raw_value(header).unwrap()).unwrap();
    }

    #[test]
    fn test_notice_from_header() {
        let header = header(19_000_000);
        let notice = HeadNotice::from(&header);
        assert_eq!(notice.number, 19_000_000);
        assert_eq!(notice.hash, header.hash);
        assert_eq!(notice.hash, header.inner.hash_slow());
    }

    #[tokio::test]
    async fn test_headers_are_forwarded_in_order() {
        let (tx, sub) = subscription(16);
        let first = header(100);
        let second = header(101);
        assert_ne!(first.hash, second.hash);
        notify(&tx, &first);
        notify(&tx, &second);

        let (mut heads, _pump) = spawn_head_pump(sub, 8);

        assert_eq!(
            heads.recv().await,
            Some(HeadEvent::Header(HeadNotice { number: 100, hash: first.hash }))
        );
        assert_eq!(
            heads.recv().await,
            Some(HeadEvent::Header(HeadNotice { number: 101, hash: second.hash }))
        );
    }

    #[tokio::test]
    async fn test_closed_subscription_yields_one_error_then_ends() {
        let (tx, sub) = subscription(16);
        notify(&tx, &header(7));
        drop(tx);

        let (mut heads, pump) = spawn_head_pump(sub, 8);

        assert!(matches!(heads.recv().await, Some(HeadEvent::Header(HeadNotice { number: 7, .. }))));
        assert!(matches!(heads.recv().await, Some(HeadEvent::Error(_))));
        assert_eq!(heads.recv().await, None);

        tokio::time::timeout(Duration::from_secs(1), pump)
            .await
            .expect("pump should stop after the error")
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_receiver_stops_pump() {
        let (tx, sub) = subscription(16);
        let (heads, pump) = spawn_head_pump(sub, 1);
        drop(heads);

        notify(&tx, &header(1));

        tokio::time::timeout(Duration::from_secs(1), pump)
            .await
            .expect("pump should stop once nobody reads")
            .unwrap();
    }

    #[tokio::test]
    async fn test_lag_is_reported_as_skipped() {
        let (tx, sub) = subscription(2);
        for number in 1..=5 {
            notify(&tx, &header(number));
        }

        let (mut heads, _pump) = spawn_head_pump(sub, 8);

        assert_eq!(heads.recv().await, Some(HeadEvent::Skipped(3)));
        assert!(matches!(heads.recv().await, Some(HeadEvent::Header(HeadNotice { number: 4, .. }))));
        assert!(matches!(heads.recv().await, Some(HeadEvent::Header(HeadNotice { number: 5, .. }))));
    }
}
