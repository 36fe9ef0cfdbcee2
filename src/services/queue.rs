//! Queue ticket operations

use super::{QUEUE_BASE_PATH, action_path};
use crate::core::{
    Ack, CalledQueue, ClaimedTicket, CounterId, CounterQueueRequest, CurrentQueue, QueueMetrics,
    QueueRecord, ReleaseQueueRequest, ResetQueuesRequest, ResetQueuesResponse,
};
use crate::envelope::{ApiOutcome, normalize};
use crate::transport::{ApiRequest, HttpMethod, Transport, TransportExt};

pub const CLAIM_FAILED: &str = "Failed to claim queue";
pub const RELEASE_FAILED: &str = "Failed to release queue";
pub const NEXT_FAILED: &str = "Failed to process next queue";
pub const SKIP_FAILED: &str = "Failed to skip queue";
pub const RESET_FAILED: &str = "Failed to reset queues";
pub const SEARCH_FAILED: &str = "Failed to search queue";
pub const METRICS_FAILED: &str = "Failed to fetch queue metrics";
pub const CURRENT_FAILED: &str = "Failed to fetch current queues";

/// `POST /api/v1/queues/claim` with no body; the server picks the counter
pub async fn claim<T: Transport + ?Sized>(transport: &T) -> ApiOutcome<ClaimedTicket> {
    let request = ApiRequest::new(HttpMethod::Post, action_path(QUEUE_BASE_PATH, "claim"));
    normalize(transport.send(request).await, CLAIM_FAILED)
}

/// `POST /api/v1/queues/release`
pub async fn release<T: Transport + ?Sized>(transport: &T, request: &ReleaseQueueRequest) -> ApiOutcome<Ack> {
    normalize(
        transport.post(&action_path(QUEUE_BASE_PATH, "release"), request).await,
        RELEASE_FAILED,
    )
}

/// `POST /api/v1/queues/next`: call the next ticket at a counter
pub async fn next<T: Transport + ?Sized>(transport: &T, counter_id: CounterId) -> ApiOutcome<CalledQueue> {
    normalize(
        transport
            .post(&action_path(QUEUE_BASE_PATH, "next"), &CounterQueueRequest { counter_id })
            .await,
        NEXT_FAILED,
    )
}

/// `POST /api/v1/queues/skip`: skip the ticket currently called at a counter
pub async fn skip<T: Transport + ?Sized>(transport: &T, counter_id: CounterId) -> ApiOutcome<CalledQueue> {
    normalize(
        transport
            .post(&action_path(QUEUE_BASE_PATH, "skip"), &CounterQueueRequest { counter_id })
            .await,
        SKIP_FAILED,
    )
}

/// `POST /api/v1/queues/reset`; `None` resets every counter
pub async fn reset<T: Transport + ?Sized>(
    transport: &T,
    counter_id: Option<CounterId>,
) -> ApiOutcome<ResetQueuesResponse> {
    normalize(
        transport
            .post(&action_path(QUEUE_BASE_PATH, "reset"), &ResetQueuesRequest { counter_id })
            .await,
        RESET_FAILED,
    )
}

/// `GET /api/v1/queues/search?q=`
pub async fn search<T: Transport + ?Sized>(transport: &T, query: &str) -> ApiOutcome<Vec<QueueRecord>> {
    normalize(
        transport
            .get(&action_path(QUEUE_BASE_PATH, "search"), &[("q", query)])
            .await,
        SEARCH_FAILED,
    )
}

/// `GET /api/v1/queues/metrics`
pub async fn metrics<T: Transport + ?Sized>(transport: &T) -> ApiOutcome<QueueMetrics> {
    normalize(
        transport.get(&action_path(QUEUE_BASE_PATH, "metrics"), &[]).await,
        METRICS_FAILED,
    )
}

/// `GET /api/v1/queues/current`: the list behind the display board
pub async fn current<T: Transport + ?Sized>(transport: &T) -> ApiOutcome<Vec<CurrentQueue>> {
    normalize(
        transport.get(&action_path(QUEUE_BASE_PATH, "current"), &[]).await,
        CURRENT_FAILED,
    )
}
