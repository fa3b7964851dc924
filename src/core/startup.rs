use anyhow::Result;
use tracing::{error, info};

use crate::core::config::Config;
use crate::core::state::AppState;
use crate::persistence::snapshot::SnapshotStore;
use crate::stores::roster::Roster;

// this runs at boot time, before anything is served
pub fn restore_roster(config: &Config, store: &SnapshotStore) -> Roster {
    let roster = store
        .load_roster(config.draw.history_capacity)
        .with_never_played_days(config.draw.never_played_days);

    info!(
        users = roster.registry().len(),
        blacklisted = roster.blacklisted_count(),
        history = roster.history_log().len(),
        save_blocked = store.is_save_blocked(),
        "Roster restored"
    );

    roster
}

/// Save the roster once at shutdown.
///
/// Failures are logged and returned; there is no retry.
pub fn persist_roster(state: &AppState) -> Result<()> {
    let roster = state.roster();

    match state.store.save(&roster) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!(
                path = %state.store.path().display(),
                error = %e,
                "Failed to save roster"
            );
            Err(e)
        }
    }
}
