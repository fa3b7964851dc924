use std::collections::HashSet;
use uuid::Uuid;

/// Per-session presence and pause membership
///
/// Invariant: `paused` is always a subset of `present`. Blacklist checks
/// live in the roster, which knows the user records.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    present: HashSet<Uuid>,
    paused: HashSet<Uuid>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip presence. Returns whether the user is present afterwards.
    pub fn toggle_presence(&mut self, id: Uuid) -> bool {
        if self.present.remove(&id) {
            self.paused.remove(&id);
            false
        } else {
            self.present.insert(id);
            true
        }
    }

    /// Flip pause for a present user.
    ///
    /// Returns `None` if the user is not present, otherwise whether the user
    /// is paused afterwards.
    pub fn toggle_pause(&mut self, id: Uuid) -> Option<bool> {
        if !self.present.contains(&id) {
            return None;
        }

        if self.paused.remove(&id) {
            Some(false)
        } else {
            self.paused.insert(id);
            Some(true)
        }
    }

    /// Drop a user from both sets. Returns whether they were present.
    pub fn evict(&mut self, id: Uuid) -> bool {
        self.paused.remove(&id);
        self.present.remove(&id)
    }

    pub fn clear(&mut self) {
        self.present.clear();
        self.paused.clear();
    }

    pub fn is_present(&self, id: Uuid) -> bool {
        self.present.contains(&id)
    }

    pub fn is_paused(&self, id: Uuid) -> bool {
        self.paused.contains(&id)
    }

    /// Present and not paused
    pub fn is_active(&self, id: Uuid) -> bool {
        self.is_present(id) && !self.is_paused(id)
    }

    pub fn present_count(&self) -> usize {
        self.present.len()
    }

    pub fn paused_count(&self) -> usize {
        self.paused.len()
    }
}
