use super::CounterId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A queue ticket held by this session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedTicket {
    pub counter_id: CounterId,
    pub counter_name: String,
    pub queue_number: u32,
    #[serde(rename = "positionInQueue")]
    pub position: u32,
    /// Minutes
    pub estimated_wait_time: u32,
}

impl fmt::Display for ClaimedTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} at {}", self.queue_number, self.counter_name)
    }
}

/// Body of the release call; the backend expects snake_case here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseQueueRequest {
    pub counter_id: CounterId,
    pub queue_number: u32,
}

/// `{ "success": bool }` payload returned by release and delete calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

/// Body of the next and skip calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterQueueRequest {
    pub counter_id: CounterId,
}

/// Body of the reset call; no counter resets every counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetQueuesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_id: Option<CounterId>,
}

/// Ticket affected by a next or skip call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalledQueue {
    pub counter_id: Option<CounterId>,
    pub counter_name: Option<String>,
    pub queue_number: Option<u32>,
    pub status: Option<QueueStatus>,
}

/// Payload of the reset call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetQueuesResponse {
    #[serde(default, alias = "count")]
    pub reset_count: u64,
}

/// Lifecycle state of a queue ticket as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueueStatus {
    Claimed,
    Called,
    #[default]
    Released,
    Served,
    Skipped,
    Unknown,
}

impl QueueStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Claimed => "CLAIMED",
            Self::Called => "CALLED",
            Self::Released => "RELEASED",
            Self::Served => "SERVED",
            Self::Skipped => "SKIPPED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "CLAIMED" => Self::Claimed,
            "CALLED" => Self::Called,
            "RELEASED" => Self::Released,
            "SERVED" => Self::Served,
            "SKIPPED" => Self::Skipped,
            _ => Self::Unknown,
        })
    }
}

impl Serialize for QueueStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QueueStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

/// One row of the current-queues list
///
/// The backend has shipped two spellings for most fields, so both are
/// accepted and the accessors pick whichever is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentQueue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_id: Option<CounterId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CounterId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_queue: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_queue_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_queue_status: Option<QueueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QueueStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_queue: Option<u32>,
}

impl CurrentQueue {
    #[must_use]
    pub fn counter_id(&self) -> Option<CounterId> {
        self.counter_id.or(self.id)
    }

    /// Counter name, falling back to `Counter <id>`
    #[must_use]
    pub fn display_name(&self) -> String {
        self.counter_name
            .as_deref()
            .or(self.name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .map_or_else(
                || match self.counter_id() {
                    Some(id) => format!("Counter {id}"),
                    None => "Counter".to_string(),
                },
                str::to_string,
            )
    }

    #[must_use]
    pub fn queue_number(&self) -> Option<u32> {
        self.current_queue.or(self.current_queue_number)
    }

    /// Status of the served ticket; a missing status reads as released
    #[must_use]
    pub fn queue_status(&self) -> QueueStatus {
        self.next_queue_status.or(self.status).unwrap_or_default()
    }
}

/// A queue ticket as returned by search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRecord {
    pub id: u64,
    pub counter_id: Option<CounterId>,
    #[serde(alias = "number")]
    pub queue_number: u32,
    #[serde(default)]
    pub status: QueueStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Aggregate queue counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMetrics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub waiting: u64,
    #[serde(default)]
    pub called: u64,
    #[serde(default)]
    pub served: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub released: u64,
    /// Fields this client does not know about yet
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
