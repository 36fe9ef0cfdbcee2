//! Test utilities for queue-desk
//!
//! This module provides common fixtures and canned backend responses to
//! reduce duplication in test code across the codebase.

#![cfg(test)]

use crate::core::{ClaimedTicket, CounterId, CurrentQueue};
use crate::transport::{RawResponse, TransportResult};
use serde_json::{Value, json};

/// The ticket handed out by [`claim_envelope`]
pub fn sample_ticket() -> ClaimedTicket {
    ClaimedTicket {
        counter_id: 2,
        counter_name: "Counter 2".to_string(),
        queue_number: 8,
        position: 3,
        estimated_wait_time: 12,
    }
}

/// A successful claim response carrying [`sample_ticket`]
pub fn claim_envelope() -> Value {
    envelope_ok(json!({
        "counterId": 2,
        "counterName": "Counter 2",
        "queueNumber": 8,
        "positionInQueue": 3,
        "estimatedWaitTime": 12
    }))
}

/// Wrap a payload in a successful envelope
pub fn envelope_ok(data: Value) -> Value {
    json!({ "status": true, "data": data })
}

/// A 200 response with the given body
pub fn respond_with(body: Value) -> TransportResult {
    Ok(RawResponse { status: 200, body })
}

/// A counter as the backend serializes it
pub fn counter_json(id: CounterId, name: &str, is_active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "isActive": is_active,
        "maxQueue": 50,
        "currentQueue": 0,
        "createdAt": "2024-05-01T08:00:00Z",
        "updatedAt": "2024-05-01T08:00:00Z",
        "deletedAt": null
    })
}

/// A current-queues row using the legacy field names
pub fn current_row(id: CounterId, name: &str, is_active: bool, current: Option<u32>) -> CurrentQueue {
    CurrentQueue {
        id: Some(id),
        name: Some(name.to_string()),
        is_active,
        current_queue: current,
        ..CurrentQueue::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_envelope_matches_sample_ticket() {
        let ticket: ClaimedTicket = serde_json::from_value(claim_envelope()["data"].clone()).unwrap();
        assert_eq!(ticket, sample_ticket());
    }

    #[test]
    fn test_counter_json_deserializes() {
        let counter: crate::core::Counter = serde_json::from_value(counter_json(3, "Counter 3", true)).unwrap();
        assert_eq!(counter.id, 3);
        assert!(counter.is_active);
    }
}
