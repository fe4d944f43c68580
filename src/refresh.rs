//! Background price refresh plumbing
//!
//! A begun refresh runs as one detached tokio task; its outcome travels
//! back to the main event loop over an mpsc channel, where it is applied
//! to the cache controller. The calling context never blocks on the
//! network.

use tokio::sync::mpsc;

use crate::data::{InsuranceClient, InsurancePrices};

/// Outcome of one background fetch, delivered to the main loop
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// The fetch succeeded with a parsed price table
    PricesFetched(InsurancePrices),
    /// The fetch failed; the cached value must be retained
    FetchFailed(String),
}

/// Spawns one fetch task reporting its outcome over `tx`
///
/// Callers must have claimed the controller's in-flight slot first;
/// this function does not enforce the at-most-one guarantee itself.
pub fn spawn_refresh(client: InsuranceClient, tx: mpsc::Sender<RefreshMessage>) {
    tokio::spawn(async move {
        let message = match client.fetch_prices().await {
            Ok(prices) => RefreshMessage::PricesFetched(prices),
            Err(e) => RefreshMessage::FetchFailed(e.to_string()),
        };
        let _ = tx.send(message).await;
    });
}

/// Checks for a pending refresh outcome without blocking
pub fn try_recv(rx: &mut mpsc::Receiver<RefreshMessage>) -> Option<RefreshMessage> {
    rx.try_recv().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_try_recv_empty_channel_is_none() {
        let (_tx, mut rx) = mpsc::channel::<RefreshMessage>(8);
        assert!(try_recv(&mut rx).is_none());
    }

    #[tokio::test]
    async fn test_try_recv_delivers_queued_message() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(RefreshMessage::FetchFailed("timed out".to_string()))
            .await
            .expect("Send should succeed");

        match try_recv(&mut rx) {
            Some(RefreshMessage::FetchFailed(reason)) => assert_eq!(reason, "timed out"),
            other => panic!("Expected FetchFailed, got {:?}", other),
        }
    }
}
