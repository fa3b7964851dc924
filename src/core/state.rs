// Application state (AppState)

use crate::core::config::Config;
use crate::core::error::RosterError;
use crate::metrics::collector::Metrics;
use crate::persistence::snapshot::SnapshotStore;
use crate::stores::roster::Roster;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared application state
///
/// The roster sits behind a single lock: each request takes it, runs its
/// operation to completion and releases it, so operations never interleave.
#[derive(Clone)]
pub struct AppState {
    /// Users, presence, history and session counters
    pub roster: Arc<Mutex<Roster>>,

    /// Counters for the stats endpoint
    pub metrics: Arc<Metrics>,

    /// Where the roster is saved at shutdown
    pub store: Arc<SnapshotStore>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, roster: Roster, store: SnapshotStore) -> Self {
        Self {
            roster: Arc::new(Mutex::new(roster)),
            metrics: Arc::new(Metrics::new()),
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    /// Lock the roster, recovering the guard if a previous holder panicked
    pub fn roster(&self) -> MutexGuard<'_, Roster> {
        self.roster
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count and log a rejected request, handing the error back for the response
    pub fn reject(&self, err: RosterError) -> RosterError {
        self.metrics.increment_rejected();
        tracing::warn!(error = %err, "Request rejected");
        err
    }
}
