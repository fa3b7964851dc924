use crate::models::history::HistoryEntry;
use crate::models::user::User;
use crate::stores::roster::Roster;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

#[derive(Deserialize)]
pub struct DrawQuery {
    /// Raw value as typed by the user; validated before drawing
    #[serde(default)]
    pub count: String,
}

#[derive(Deserialize)]
pub struct PechvogelQuery {
    pub count: Option<usize>,
}

#[derive(Deserialize)]
pub struct NewUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// A user as shown to the front end, with session state folded in
#[derive(Debug, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub last_played: Option<DateTime<Utc>>,
    pub days_waiting: i64,
    pub total_games: u32,
    pub session_games: u32,
    pub is_blacklisted: bool,
    pub is_present: bool,
    pub is_paused: bool,
}

impl UserView {
    pub fn new(user: &User, roster: &Roster, now: DateTime<Utc>) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            display_name: user.display_name(),
            last_played: user.last_played,
            days_waiting: roster.days_waiting(user, now),
            total_games: user.total_games,
            session_games: roster.session_games(user.id),
            is_blacklisted: user.is_blacklisted,
            is_present: roster.is_present(user.id),
            is_paused: roster.is_paused(user.id),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<UserView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkImportResponse {
    pub success: bool,
    pub added: usize,
    pub skipped: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub user: UserView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEntryView {
    pub timestamp: DateTime<Utc>,
    pub players: Vec<String>,
}

impl From<HistoryEntry> for HistoryEntryView {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            players: entry.players,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    /// Newest first
    pub history: Vec<HistoryEntryView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DrawResponse {
    pub success: bool,
    pub winners: Vec<UserView>,
    /// Newest first, including this draw
    pub history: Vec<HistoryEntryView>,
}

#[derive(Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
