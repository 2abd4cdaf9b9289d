// src/core/history.rs

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How many completed engagements are remembered.
pub const HISTORY_CAPACITY: usize = 5;

/// One completed engagement attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementHistoryEntry {
    pub target: String,
    pub timestamp: DateTime<Utc>,
}

impl EngagementHistoryEntry {
    pub fn new(target: &str, timestamp: DateTime<Utc>) -> Self {
        Self { target: target.to_string(), timestamp }
    }

    /// Local wall-clock time, as shown next to the target.
    pub fn display_time(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
    }
}

/// Bounded, most-recent-first log of engagements. Evicted entries are dropped.
#[derive(Debug, Clone)]
pub struct EngagementHistory {
    entries: VecDeque<EngagementHistoryEntry>,
}

impl Default for EngagementHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EngagementHistory {
    pub fn new() -> Self {
        Self { entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1) }
    }

    pub fn record(&mut self, entry: EngagementHistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Entries, most recent first.
    pub fn list(&self) -> impl Iterator<Item = &EngagementHistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
