use crate::models::history::HistoryEntry;
use crate::models::user::User;
use crate::stores::history::HistoryLog;
use crate::stores::registry::UserRegistry;
use crate::stores::roster::Roster;
use crate::utils::time::{format_timestamp, parse_timestamp};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};
use uuid::Uuid;

/// One user as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub last_played: Option<String>,
    pub total_games: u32,
    pub is_blacklisted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: String,
    #[serde(default)]
    pub players: Vec<String>,
}

/// Accepted on-disk layouts
///
/// The oldest files are a bare list of users without history. Records stay
/// raw JSON here and are converted one by one, so a bad record only costs
/// that record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Legacy(Vec<Value>),
    Current {
        users: Vec<Value>,
        #[serde(default)]
        history: Vec<Value>,
    },
}

#[derive(Debug, Serialize)]
struct DocumentOut {
    users: Vec<UserRecord>,
    history: Vec<HistoryRecord>,
}

/// Users and history read from disk
#[derive(Debug, Default)]
pub struct LoadedState {
    pub users: Vec<User>,
    /// Chronological, oldest first
    pub history: Vec<HistoryEntry>,
}

impl UserRecord {
    /// Read a stored user field by field.
    ///
    /// Fields of the wrong type fall back to their defaults with a warning.
    /// Records without a first name are dropped.
    fn from_value(value: Value) -> Option<Self> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                warn!(record = %other, "Stored user is not an object, dropping it");
                return None;
            }
        };

        let first_name = match fields.remove("first_name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name,
            other => {
                warn!(
                    id = ?fields.get("id"),
                    first_name = ?other,
                    "Stored user has no usable first name, dropping it"
                );
                return None;
            }
        };

        // Non-string ids are kept as text and replaced in `into_user`
        let id = match fields.remove("id") {
            Some(Value::String(id)) => id,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        Some(Self {
            last_name: take_field(&mut fields, "last_name", &first_name),
            last_played: take_field(&mut fields, "last_played", &first_name),
            total_games: take_field(&mut fields, "total_games", &first_name),
            is_blacklisted: take_field(&mut fields, "is_blacklisted", &first_name),
            id,
            first_name,
        })
    }

    fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            last_played: user.last_played.map(format_timestamp),
            total_games: user.total_games,
            is_blacklisted: user.is_blacklisted,
        }
    }

    /// Convert to a domain user, repairing what can be repaired
    fn into_user(self) -> User {
        let id = match Uuid::parse_str(self.id.trim()) {
            Ok(id) => id,
            Err(e) => {
                let fresh = Uuid::new_v4();
                warn!(
                    stored_id = %self.id,
                    new_id = %fresh,
                    first_name = %self.first_name,
                    error = %e,
                    "Malformed user id, assigning a fresh one"
                );
                fresh
            }
        };

        let last_played = self.last_played.as_deref().and_then(|raw| match parse_timestamp(raw) {
            Some(ts) if is_placeholder(ts) => None,
            Some(ts) => Some(ts),
            None => {
                warn!(
                    user_id = %id,
                    last_played = %raw,
                    "Unreadable last_played, treating user as never played"
                );
                None
            }
        });

        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            last_played,
            total_games: self.total_games,
            is_blacklisted: self.is_blacklisted,
        }
    }
}

/// Missing fields take the default silently, unreadable ones with a warning
fn take_field<T>(fields: &mut Map<String, Value>, key: &str, user: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = fields.remove(key) else {
        return T::default();
    };

    match serde_json::from_value(raw.clone()) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                user = %user,
                field = key,
                value = %raw,
                error = %e,
                "Unreadable stored field, using default"
            );
            T::default()
        }
    }
}

/// The first version stored `0001-01-01` for users who had not played yet
fn is_placeholder(ts: DateTime<Utc>) -> bool {
    ts.year() <= 1
}

impl HistoryRecord {
    fn from_value(value: Value) -> Option<Self> {
        match serde_json::from_value(value.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(record = %value, error = %e, "Unreadable history entry, dropping it");
                None
            }
        }
    }

    fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            timestamp: format_timestamp(entry.timestamp),
            players: entry.players.clone(),
        }
    }

    fn into_entry(self) -> Option<HistoryEntry> {
        match parse_timestamp(&self.timestamp) {
            Some(ts) => Some(HistoryEntry::new(ts, self.players)),
            None => {
                warn!(timestamp = %self.timestamp, "Unreadable history timestamp, dropping entry");
                None
            }
        }
    }
}

/// Parse a stored document, tolerating bad records
pub fn decode(content: &str) -> Result<LoadedState> {
    let document: StoredDocument =
        serde_json::from_str(content).context("Failed to parse roster document")?;

    let (users, history) = match document {
        StoredDocument::Legacy(users) => {
            info!(users = users.len(), "Legacy roster format detected, starting with empty history");
            (users, Vec::new())
        }
        StoredDocument::Current { users, history } => (users, history),
    };

    Ok(LoadedState {
        users: users
            .into_iter()
            .filter_map(UserRecord::from_value)
            .map(UserRecord::into_user)
            .collect(),
        history: history
            .into_iter()
            .filter_map(HistoryRecord::from_value)
            .filter_map(HistoryRecord::into_entry)
            .collect(),
    })
}

pub fn encode(roster: &Roster) -> Result<String> {
    let document = DocumentOut {
        users: roster.registry().iter().map(UserRecord::from_user).collect(),
        history: roster
            .history_log()
            .chronological()
            .map(HistoryRecord::from_entry)
            .collect(),
    };

    serde_json::to_string_pretty(&document).context("Failed to serialize roster")
}

/// JSON file holding the roster between runs
pub struct SnapshotStore {
    path: PathBuf,
    /// Set when the stored file could not be read or moved aside; saving
    /// would then overwrite data this run never saw
    save_blocked: AtomicBool,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            save_blocked: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_save_blocked(&self) -> bool {
        self.save_blocked.load(Ordering::Relaxed)
    }

    /// Read the stored state. Never fails: problems are logged and an empty
    /// state is returned.
    ///
    /// A malformed document is moved aside so the next save does not
    /// overwrite it. If the file cannot be read or moved, saving is blocked
    /// for the rest of the run.
    pub fn load(&self) -> LoadedState {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Roster file not found, starting with an empty roster");
                return LoadedState::default();
            }
            Err(e) => {
                error!(
                    path = %self.path.display(),
                    error = %e,
                    "Cannot read roster file, starting empty with saving disabled"
                );
                self.save_blocked.store(true, Ordering::Relaxed);
                return LoadedState::default();
            }
        };

        match decode(&content) {
            Ok(state) => {
                info!(
                    path = %self.path.display(),
                    users = state.users.len(),
                    history = state.history.len(),
                    "Roster loaded"
                );
                state
            }
            Err(e) => {
                let backup = self.corrupt_path();
                error!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "Roster file is malformed, moving it aside and starting empty"
                );
                if let Err(e) = fs::rename(&self.path, &backup) {
                    error!(
                        path = %self.path.display(),
                        backup = %backup.display(),
                        error = %e,
                        "Cannot move malformed roster file, saving disabled for this run"
                    );
                    self.save_blocked.store(true, Ordering::Relaxed);
                }
                LoadedState::default()
            }
        }
    }

    /// Load and build the in-memory roster
    pub fn load_roster(&self, history_capacity: usize) -> Roster {
        let state = self.load();
        Roster::new(
            UserRegistry::from_users(state.users),
            HistoryLog::from_entries(state.history, history_capacity),
        )
    }

    /// Write the roster, replacing the file atomically
    pub fn save(&self, roster: &Roster) -> Result<()> {
        if self.is_save_blocked() {
            bail!(
                "Refusing to overwrite {}: it could not be loaded at startup",
                self.path.display()
            );
        }

        let content = encode(roster)?;
        let tmp_path = self.tmp_path();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = fs::File::create(&tmp_path)
            .context(format!("Failed to create temporary file: {}", tmp_path.display()))?;
        file.write_all(content.as_bytes())
            .context("Failed to write roster")?;
        file.sync_all().context("Failed to flush roster to disk")?;
        drop(file);

        fs::rename(&tmp_path, &self.path)
            .context(format!("Failed to replace roster file: {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            users = roster.registry().len(),
            history = roster.history_log().len(),
            "Roster saved"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        sibling_with_suffix(&self.path, "tmp")
    }

    /// `<name>.corrupt`, or a timestamped name when an earlier backup exists
    fn corrupt_path(&self) -> PathBuf {
        let backup = sibling_with_suffix(&self.path, "corrupt");
        if !backup.exists() {
            return backup;
        }

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        sibling_with_suffix(&self.path, &format!("corrupt.{}", stamp))
    }
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
