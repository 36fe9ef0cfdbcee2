//! Counter CRUD

use super::{COUNTER_BASE_PATH, action_path, collection_path, item_path};
use crate::core::{Ack, Counter, CounterId, CreateCounterRequest, UpdateCounterRequest};
use crate::envelope::{ApiOutcome, normalize};
use crate::transport::{Transport, TransportExt};

pub const LIST_FAILED: &str = "Failed to fetch counters";
pub const GET_FAILED: &str = "Failed to fetch counter";
pub const CREATE_FAILED: &str = "Failed to create counter";
pub const UPDATE_FAILED: &str = "Failed to update counter";
pub const DELETE_FAILED: &str = "Failed to delete counter";

/// `GET /api/v1/counters/`
pub async fn list<T: Transport + ?Sized>(transport: &T) -> ApiOutcome<Vec<Counter>> {
    normalize(transport.get(&collection_path(COUNTER_BASE_PATH), &[]).await, LIST_FAILED)
}

/// `GET /api/v1/counters/:id`
pub async fn get<T: Transport + ?Sized>(transport: &T, id: CounterId) -> ApiOutcome<Counter> {
    normalize(transport.get(&item_path(COUNTER_BASE_PATH, id), &[]).await, GET_FAILED)
}

/// `POST /api/v1/counters/create`
pub async fn create<T: Transport + ?Sized>(
    transport: &T,
    request: &CreateCounterRequest,
) -> ApiOutcome<Counter> {
    normalize(
        transport.post(&action_path(COUNTER_BASE_PATH, "create"), request).await,
        CREATE_FAILED,
    )
}

/// `PUT /api/v1/counters/:id`; the id travels in the path only
pub async fn update<T: Transport + ?Sized>(
    transport: &T,
    id: CounterId,
    request: &UpdateCounterRequest,
) -> ApiOutcome<Counter> {
    normalize(transport.put(&item_path(COUNTER_BASE_PATH, id), request).await, UPDATE_FAILED)
}

/// `DELETE /api/v1/counters/:id`
pub async fn delete<T: Transport + ?Sized>(transport: &T, id: CounterId) -> ApiOutcome<Ack> {
    normalize(transport.delete(&item_path(COUNTER_BASE_PATH, id)).await, DELETE_FAILED)
}
