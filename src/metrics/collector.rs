use crate::stores::roster::Roster;
use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    pub draws_performed: AtomicU64,
    pub players_drawn: AtomicU64,
    pub rejected_requests: AtomicU64,
    pub start_time: i64,
}

#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub draws_performed: u64,
    pub players_drawn: u64,
    pub rejected_requests: u64,
    pub users: usize,
    pub present: usize,
    pub paused: usize,
    pub blacklisted: usize,
    pub candidates: usize,
    pub history_entries: usize,
    pub uptime_seconds: i64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            draws_performed: AtomicU64::new(0),
            players_drawn: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
            start_time: Utc::now().timestamp(),
        }
    }


    pub fn record_draw(&self, winners: usize) {
        self.draws_performed.fetch_add(1, Ordering::Relaxed);
        self.players_drawn.fetch_add(winners as u64, Ordering::Relaxed);
    }


    pub fn increment_rejected(&self) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
    }


    /// Counters plus a view of the current roster
    pub fn get_snapshot(&self, roster: &Roster) -> MetricsSnapshot {
        let uptime_seconds = (Utc::now().timestamp() - self.start_time).max(0);

        MetricsSnapshot {
            draws_performed: self.draws_performed.load(Ordering::Relaxed),
            players_drawn: self.players_drawn.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            users: roster.registry().len(),
            present: roster.present_count(),
            paused: roster.paused_count(),
            blacklisted: roster.blacklisted_count(),
            candidates: roster.candidates().len(),
            history_entries: roster.history_log().len(),
            uptime_seconds,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
