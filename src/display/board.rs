use crate::core::{CounterId, CurrentQueue, QueueStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Shown when no counter is active
pub const EMPTY_BOARD_MESSAGE: &str = "No active counters at the moment.";

/// One row of the public display board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardEntry {
    pub counter_id: Option<CounterId>,
    pub counter_name: String,
    /// `None` while the counter has not served anyone yet
    pub queue_number: Option<u32>,
    pub status: QueueStatus,
}

impl BoardEntry {
    #[must_use]
    pub fn from_row(row: &CurrentQueue) -> Self {
        Self {
            counter_id: row.counter_id(),
            counter_name: row.display_name(),
            queue_number: row.queue_number(),
            status: row.queue_status(),
        }
    }
}

/// The board as of one successful poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub entries: Vec<BoardEntry>,
    pub fetched_at: DateTime<Utc>,
}

impl BoardSnapshot {
    /// Build a snapshot, keeping only counters flagged active
    #[must_use]
    pub fn from_current(rows: &[CurrentQueue], fetched_at: DateTime<Utc>) -> Self {
        Self {
            entries: rows
                .iter()
                .filter(|row| row.is_active)
                .map(BoardEntry::from_row)
                .collect(),
            fetched_at,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain-text rendering, one line per counter
    #[must_use]
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return EMPTY_BOARD_MESSAGE.to_string();
        }

        let width = self
            .entries
            .iter()
            .map(|e| e.counter_name.chars().count())
            .max()
            .unwrap_or_default();

        self.entries
            .iter()
            .map(|entry| {
                let number = entry
                    .queue_number
                    .map_or_else(|| "-".to_string(), |n| format!("{n:03}"));
                format!("{:<width$}  {number:>5}  {}", entry.counter_name, entry.status)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
