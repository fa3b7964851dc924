use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    /// Stable identity, unique within the registry
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// `None` means the user has never played
    pub last_played: Option<DateTime<Utc>>,
    pub total_games: u32,
    pub is_blacklisted: bool,
}

impl User {
    /// A brand-new user: fresh id, never played, no games, not blacklisted
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            last_played: None,
            total_games: 0,
            is_blacklisted: false,
        }
    }

    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// Key used to order the registry: (first, last), case-insensitive
    pub fn sort_key(&self) -> (String, String) {
        (self.first_name.to_lowercase(), self.last_name.to_lowercase())
    }

    /// Copy of this user after having been drawn at `at`
    pub fn played_at(&self, at: DateTime<Utc>) -> Self {
        Self {
            last_played: Some(at),
            total_games: self.total_games.saturating_add(1),
            ..self.clone()
        }
    }

    pub fn with_blacklisted(&self, is_blacklisted: bool) -> Self {
        Self {
            is_blacklisted,
            ..self.clone()
        }
    }
}
