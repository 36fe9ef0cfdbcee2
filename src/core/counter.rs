use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a counter (service point)
pub type CounterId = u64;

/// A service point as projected by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub id: CounterId,
    pub name: String,
    pub is_active: bool,
    pub max_queue: u32,
    #[serde(default)]
    pub current_queue: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Set when the counter has been soft-deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Counter {
    /// Whether the backend has soft-deleted this counter
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Remaining capacity before the counter stops accepting tickets
    #[must_use]
    pub const fn remaining_capacity(&self) -> u32 {
        self.max_queue.saturating_sub(self.current_queue)
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

/// Body of `POST /api/v1/counters/create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCounterRequest {
    pub name: String,
    pub max_queue: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Body of `PUT /api/v1/counters/:id`; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCounterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_queue: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateCounterRequest {
    /// Whether the request would change nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.max_queue.is_none() && self.is_active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counter_deserializes_backend_shape() {
        let counter: Counter = serde_json::from_value(json!({
            "id": 2,
            "name": "Counter 2",
            "isActive": true,
            "maxQueue": 50,
            "currentQueue": 8,
            "createdAt": "2024-05-01T08:00:00Z",
            "updatedAt": "2024-05-01T09:30:00Z",
            "deletedAt": null
        }))
        .unwrap();

        assert_eq!(counter.name, "Counter 2");
        assert_eq!(counter.remaining_capacity(), 42);
        assert!(!counter.is_deleted());
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let request = UpdateCounterRequest {
            max_queue: Some(20),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({ "maxQueue": 20 }));
        assert!(UpdateCounterRequest::default().is_empty());
    }
}
