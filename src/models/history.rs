use chrono::{DateTime, Utc};
use serde::Serialize;

/// One completed draw
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    /// Winner display names, in draw order
    pub players: Vec<String>,
}

impl HistoryEntry {
    pub fn new(timestamp: DateTime<Utc>, players: Vec<String>) -> Self {
        Self { timestamp, players }
    }
}
