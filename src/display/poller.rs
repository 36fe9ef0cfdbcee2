use super::BoardSnapshot;
use crate::services::queue;
use crate::storage::TokenRepository;
use crate::transport::Transport;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default refresh period of the display board
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Periodically refreshes the current-queues list
///
/// The first poll runs immediately, then one per interval. Polling only
/// reads; it never touches the ticket state machine. A failed poll keeps
/// the last good snapshot. A 401 clears the stored token so later
/// requests go out without it.
#[derive(Clone)]
pub struct BoardPoller {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenRepository>,
    interval: Duration,
}

/// Running poll loop
#[derive(Debug)]
pub struct PollHandle {
    snapshots: watch::Receiver<Option<BoardSnapshot>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl BoardPoller {
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenRepository>, interval: Duration) -> Self {
        Self {
            transport,
            tokens,
            interval,
        }
    }

    /// Fetch once
    pub async fn poll_once(&self) -> crate::error::Result<BoardSnapshot> {
        match queue::current(self.transport.as_ref()).await {
            Ok(reply) => Ok(BoardSnapshot::from_current(&reply.data, Utc::now())),
            Err(failure) => {
                if failure.is_unauthorized() {
                    warn!("server rejected the stored token; clearing it");
                    if let Err(e) = self.tokens.clear_token() {
                        warn!(error = %e, "failed to clear stored token");
                    }
                }
                Err(failure.into())
            },
        }
    }

    /// Start the loop on its own task
    #[must_use]
    pub fn spawn(self) -> PollHandle {
        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {},
                }

                let result = tokio::select! {
                    () = token.cancelled() => break,
                    result = self.poll_once() => result,
                };
                match result {
                    Ok(snapshot) => {
                        debug!(entries = snapshot.entries.len(), "display board refreshed");
                        if tx.send(Some(snapshot)).is_err() {
                            break;
                        }
                    },
                    Err(e) => warn!(error = %e, "display board refresh failed; keeping last snapshot"),
                }
            }
            debug!("display board poller stopped");
        });

        PollHandle {
            snapshots: rx,
            cancel,
            task,
        }
    }
}

impl PollHandle {
    /// Receiver that sees each new snapshot
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<BoardSnapshot>> {
        self.snapshots.clone()
    }

    /// Latest snapshot, if any poll has succeeded yet
    #[must_use]
    pub fn latest(&self) -> Option<BoardSnapshot> {
        self.snapshots.borrow().clone()
    }

    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop polling and wait for the loop to exit
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "display board poller panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySessionStore;
    use crate::test_utils::{envelope_ok, respond_with};
    use crate::transport::{MockTransport, TransportError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_transport(calls: Arc<AtomicUsize>) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r| r.path == "/api/v1/queues/current")
            .returning(move |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n == 1 {
                    return Err(TransportError::status(502, None));
                }
                respond_with(envelope_ok(json!([
                    { "id": 1, "name": "Counter 1", "isActive": true, "currentQueue": n },
                    { "id": 2, "name": "Counter 2", "isActive": false, "currentQueue": 9 }
                ])))
            });
        transport
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_on_every_tick_until_cancelled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = BoardPoller::new(
            Arc::new(counting_transport(calls.clone())),
            Arc::new(MemorySessionStore::default()),
            DEFAULT_POLL_INTERVAL,
        );
        let handle = poller.spawn();

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_poll_keeps_last_snapshot() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = BoardPoller::new(
            Arc::new(counting_transport(calls.clone())),
            Arc::new(MemorySessionStore::default()),
            DEFAULT_POLL_INTERVAL,
        );
        let handle = poller.spawn();

        tokio::time::sleep(Duration::from_secs(1)).await;
        let first = handle.latest().unwrap();
        assert_eq!(first.entries.len(), 1);
        assert_eq!(first.entries[0].queue_number, Some(0));

        // second poll fails
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(handle.latest(), Some(first));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(handle.latest().unwrap().entries[0].queue_number, Some(2));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_unauthorized_poll_clears_stored_token() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(TransportError::status(401, Some(json!({ "status": false, "message": "Token expired" })))));
        let store = Arc::new(MemorySessionStore::with_token("stale"));
        let poller = BoardPoller::new(Arc::new(transport), store.clone(), DEFAULT_POLL_INTERVAL);

        assert!(poller.poll_once().await.is_err());
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_other_poll_failures_keep_stored_token() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(TransportError::status(502, None)));
        let store = Arc::new(MemorySessionStore::with_token("valid"));
        let poller = BoardPoller::new(Arc::new(transport), store.clone(), DEFAULT_POLL_INTERVAL);

        assert!(poller.poll_once().await.is_err());
        assert_eq!(store.load_token().unwrap().as_deref(), Some("valid"));
    }
}
