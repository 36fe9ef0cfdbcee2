use super::{Counter, CounterId, CurrentQueue};
use chrono::{DateTime, Utc};

/// Builder for [`Counter`] projections
///
/// The dashboard only receives current-queue rows, so it assembles
/// counters locally with this builder.
#[derive(Debug, Default)]
pub struct CounterBuilder {
    id: CounterId,
    name: Option<String>,
    is_active: bool,
    max_queue: u32,
    current_queue: u32,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl CounterBuilder {
    /// Create a new counter builder
    #[must_use]
    pub fn new(id: CounterId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Start from a row of the current-queues list
    #[must_use]
    pub fn from_current(row: &CurrentQueue) -> Self {
        Self::new(row.counter_id().unwrap_or_default())
            .name(row.display_name())
            .active(row.is_active)
            .max_queue(row.max_queue.unwrap_or_default())
            .current_queue(row.queue_number().unwrap_or_default())
    }

    /// Set the name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the active flag
    #[must_use]
    pub const fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Set the maximum queue capacity
    #[must_use]
    pub const fn max_queue(mut self, max_queue: u32) -> Self {
        self.max_queue = max_queue;
        self
    }

    /// Set the current queue count
    #[must_use]
    pub const fn current_queue(mut self, current_queue: u32) -> Self {
        self.current_queue = current_queue;
        self
    }

    /// Set `created_at` and `updated_at`
    #[must_use]
    pub const fn timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
        self
    }

    /// Mark the counter as soft-deleted
    #[must_use]
    pub const fn deleted_at(mut self, deleted_at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(deleted_at);
        self
    }

    /// Build the counter
    #[must_use]
    pub fn build(self) -> Counter {
        let id = self.id;
        Counter {
            id,
            name: self.name.unwrap_or_else(|| format!("Counter {id}")),
            is_active: self.is_active,
            max_queue: self.max_queue,
            current_queue: self.current_queue,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QueueStatus;

    #[test]
    fn test_builder_defaults_name_from_id() {
        let counter = CounterBuilder::new(7).active(true).max_queue(30).build();
        assert_eq!(counter.name, "Counter 7");
        assert!(counter.is_active);
        assert_eq!(counter.remaining_capacity(), 30);
    }

    #[test]
    fn test_builder_from_current_row() {
        let row = CurrentQueue {
            counter_id: Some(3),
            counter_name: Some("Loket A".into()),
            is_active: true,
            current_queue_number: Some(12),
            max_queue: Some(40),
            status: Some(QueueStatus::Called),
            ..CurrentQueue::default()
        };
        let counter = CounterBuilder::from_current(&row).build();
        assert_eq!(counter.id, 3);
        assert_eq!(counter.name, "Loket A");
        assert_eq!(counter.current_queue, 12);
        assert_eq!(counter.max_queue, 40);
    }
}
