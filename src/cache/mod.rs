//! Query result cache
//!
//! Results are stored under hierarchical [`QueryKey`]s such as
//! `["counters"]` or `["counters", "2"]`. Invalidating a key drops every
//! entry the key is a prefix of, so invalidating `["queues"]` also drops
//! the current-queues list, the metrics and every search.

use crate::core::{AdminId, CounterId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Hierarchical cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn counters() -> Self {
        Self::new(["counters"])
    }

    #[must_use]
    pub fn counter(id: CounterId) -> Self {
        Self::new(["counters".to_string(), id.to_string()])
    }

    #[must_use]
    pub fn admins() -> Self {
        Self::new(["admins"])
    }

    #[must_use]
    pub fn admin(id: AdminId) -> Self {
        Self::new(["admins".to_string(), id.to_string()])
    }

    #[must_use]
    pub fn queues() -> Self {
        Self::new(["queues"])
    }

    #[must_use]
    pub fn current_queues() -> Self {
        Self::new(["queues", "current"])
    }

    #[must_use]
    pub fn queue_metrics() -> Self {
        Self::new(["queues", "metrics"])
    }

    #[must_use]
    pub fn queue_search(query: &str) -> Self {
        Self::new(["queues", "search", query])
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether `prefix` covers this key
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

/// In-memory cache of query results, stored as JSON
#[derive(Debug)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    stale_after: Duration,
}

impl QueryCache {
    /// Entries older than `stale_after` are treated as absent
    #[must_use]
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_after,
        }
    }

    /// Fresh cached value for `key`, if any
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() >= self.stale_after {
            return None;
        }
        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(%key, error = %e, "cached value has an unexpected shape");
                None
            },
        }
    }

    pub fn insert<T: Serialize>(&mut self, key: QueryKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(
                    key,
                    CacheEntry {
                        value,
                        stored_at: Instant::now(),
                    },
                );
            },
            Err(e) => tracing::debug!(%key, error = %e, "value not cached"),
        }
    }

    /// Drop every entry under `prefix`, returning how many were dropped
    pub fn invalidate(&mut self, prefix: &QueryKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let dropped = before - self.entries.len();
        tracing::debug!(%prefix, dropped, "cache invalidated");
        dropped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
