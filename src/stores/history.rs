use crate::models::history::HistoryEntry;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Bounded log of past draws, oldest evicted first
#[derive(Debug)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build from entries in chronological order, keeping the newest `capacity`
    pub fn from_entries(entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let mut log = Self::with_capacity(capacity);
        for entry in entries {
            log.push(entry);
        }
        log
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Newest entry first
    pub fn recent_first(&self) -> Vec<HistoryEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    /// Oldest entry first, as persisted
    pub fn chronological(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn entry(n: usize) -> HistoryEntry {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap();
        HistoryEntry::new(base + Duration::hours(n as i64), vec![format!("Player {}", n)])
    }

    #[test]
    fn test_recent_first() {
        let mut log = HistoryLog::default();
        log.push(entry(1));
        log.push(entry(2));
        log.push(entry(3));

        let recent = log.recent_first();
        assert_eq!(recent[0], entry(3));
        assert_eq!(recent[2], entry(1));
    }

    #[test]
    fn test_31st_entry_evicts_oldest() {
        let mut log = HistoryLog::default();
        for n in 1..=30 {
            log.push(entry(n));
        }
        assert_eq!(log.len(), 30);

        log.push(entry(31));

        assert_eq!(log.len(), 30);
        let kept: Vec<HistoryEntry> = log.chronological().cloned().collect();
        let expected: Vec<HistoryEntry> = (2..=31).map(entry).collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_from_entries_keeps_newest() {
        let log = HistoryLog::from_entries((1..=5).map(entry).collect(), 3);

        let kept: Vec<HistoryEntry> = log.chronological().cloned().collect();
        assert_eq!(kept, vec![entry(3), entry(4), entry(5)]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut log = HistoryLog::with_capacity(0);
        log.push(entry(1));
        assert!(log.is_empty());
    }
}
