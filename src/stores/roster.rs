use crate::core::error::RosterError;
use crate::draw::engine::{self, NEVER_PLAYED_DAYS};
use crate::models::history::HistoryEntry;
use crate::models::user::User;
use crate::stores::history::HistoryLog;
use crate::stores::presence::PresenceTracker;
use crate::stores::registry::{BulkImportReport, UserRegistry};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Result of a committed draw
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    /// Winners in draw order, with their post-commit state
    pub winners: Vec<User>,
    /// History snapshot after the draw, newest first
    pub history: Vec<HistoryEntry>,
}

/// The complete session state: registry, presence, history and per-run counters.
///
/// Every operation runs to completion and either fully applies or leaves the
/// roster untouched.
#[derive(Debug)]
pub struct Roster {
    registry: UserRegistry,
    presence: PresenceTracker,
    history: HistoryLog,
    /// Draws per user during this run; never persisted
    session_games: HashMap<Uuid, u32>,
    never_played_days: i64,
}

impl Roster {
    pub fn new(registry: UserRegistry, history: HistoryLog) -> Self {
        Self {
            registry,
            presence: PresenceTracker::new(),
            history,
            session_games: HashMap::new(),
            never_played_days: NEVER_PLAYED_DAYS,
        }
    }

    pub fn with_never_played_days(mut self, days: i64) -> Self {
        self.never_played_days = days;
        self
    }

    pub fn add_user(&mut self, first: &str, last: &str) -> Result<User, RosterError> {
        let user = self.registry.add(first, last)?;
        info!(user_id = %user.id, name = %user.display_name(), "User added");
        Ok(user)
    }

    pub fn bulk_add<'a, I>(&mut self, lines: I) -> BulkImportReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let report = self.registry.bulk_add(lines);
        info!(added = report.added, skipped = report.skipped, "Bulk import finished");
        report
    }

    /// Remove a user together with their presence, pause and session state
    pub fn delete_user(&mut self, id: Uuid) -> Result<User, RosterError> {
        let user = self.registry.delete(id).ok_or(RosterError::NotFound(id))?;
        self.presence.evict(id);
        self.session_games.remove(&id);
        info!(user_id = %id, name = %user.display_name(), "User deleted");
        Ok(user)
    }

    /// Returns whether the user is present afterwards
    pub fn toggle_presence(&mut self, id: Uuid) -> Result<bool, RosterError> {
        let user = self.registry.get(id).ok_or(RosterError::NotFound(id))?;
        if user.is_blacklisted {
            debug!(user_id = %id, "Presence toggle rejected: user is blacklisted");
            return Err(RosterError::Blacklisted(id));
        }

        let present = self.presence.toggle_presence(id);
        debug!(user_id = %id, present, "Presence toggled");
        Ok(present)
    }

    /// Returns whether the user is paused afterwards
    pub fn toggle_pause(&mut self, id: Uuid) -> Result<bool, RosterError> {
        if !self.registry.contains(id) {
            return Err(RosterError::NotFound(id));
        }

        let paused = self
            .presence
            .toggle_pause(id)
            .ok_or(RosterError::NotPresent(id))?;
        debug!(user_id = %id, paused, "Pause toggled");
        Ok(paused)
    }

    /// Returns whether the user is blacklisted afterwards
    pub fn toggle_blacklist(&mut self, id: Uuid) -> Result<bool, RosterError> {
        let user = self.registry.get(id).ok_or(RosterError::NotFound(id))?;
        let blacklisted = !user.is_blacklisted;
        let updated = user.with_blacklisted(blacklisted);
        self.registry.replace(updated);

        if blacklisted && self.presence.evict(id) {
            debug!(user_id = %id, "Blacklisted user removed from presence");
        }

        info!(user_id = %id, blacklisted, "Blacklist toggled");
        Ok(blacklisted)
    }

    pub fn clear_presence(&mut self) {
        self.presence.clear();
        info!("Presence cleared");
    }

    /// Present, not paused, not blacklisted; in display order
    pub fn candidates(&self) -> Vec<&User> {
        self.registry
            .iter()
            .filter(|u| !u.is_blacklisted && self.presence.is_active(u.id))
            .collect()
    }

    /// Draw `count` winners and commit the result.
    ///
    /// Only winners are touched: last played becomes `now`, total and session
    /// counters go up by one. One history entry is appended.
    pub fn request_draw<R>(&mut self, count: usize, now: DateTime<Utc>, rng: &mut R) -> Result<DrawOutcome, RosterError>
    where
        R: Rng + ?Sized,
    {
        let candidates: Vec<User> = self.candidates().into_iter().cloned().collect();
        if candidates.is_empty() {
            return Err(RosterError::EmptyPool);
        }

        let drawn = engine::draw_winners(&candidates, count, now, self.never_played_days, rng);
        let expected = count.min(candidates.len());
        if drawn.len() != expected {
            error!(
                expected,
                drawn = drawn.len(),
                never_played_days = self.never_played_days,
                "Draw came up short, nothing committed"
            );
            return Err(RosterError::DrawIncomplete {
                expected,
                drawn: drawn.len(),
            });
        }

        let mut winners = Vec::with_capacity(drawn.len());
        for user in drawn {
            let updated = user.played_at(now);
            self.registry.replace(updated.clone());
            *self.session_games.entry(user.id).or_insert(0) += 1;
            winners.push(updated);
        }

        let names: Vec<String> = winners.iter().map(User::display_name).collect();
        info!(
            requested = count,
            candidates = candidates.len(),
            winners = ?names,
            "Draw committed"
        );
        self.history.push(HistoryEntry::new(now, names));

        Ok(DrawOutcome {
            winners,
            history: self.history.recent_first(),
        })
    }

    /// Active candidates who have waited longest
    pub fn pechvogel(&self, n: usize, now: DateTime<Utc>) -> Vec<&User> {
        engine::longest_waiting(&self.candidates(), n, now, self.never_played_days)
    }

    pub fn days_waiting(&self, user: &User, now: DateTime<Utc>) -> i64 {
        engine::days_waiting(user, now, self.never_played_days)
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.recent_first()
    }

    pub fn history_log(&self) -> &HistoryLog {
        &self.history
    }

    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.registry.get(id)
    }

    pub fn session_games(&self, id: Uuid) -> u32 {
        self.session_games.get(&id).copied().unwrap_or(0)
    }

    pub fn is_present(&self, id: Uuid) -> bool {
        self.presence.is_present(id)
    }

    pub fn is_paused(&self, id: Uuid) -> bool {
        self.presence.is_paused(id)
    }

    pub fn present_count(&self) -> usize {
        self.presence.present_count()
    }

    pub fn paused_count(&self) -> usize {
        self.presence.paused_count()
    }

    pub fn blacklisted_count(&self) -> usize {
        self.registry.iter().filter(|u| u.is_blacklisted).count()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(UserRegistry::new(), HistoryLog::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 19, 0, 0).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    /// Alice never played, Bob played 5 days ago, Carol is blacklisted.
    /// All three were marked present before Carol got blacklisted.
    fn scenario() -> (Roster, Uuid, Uuid, Uuid) {
        let mut alice = User::new("Alice", "");
        alice.last_played = None;
        let mut bob = User::new("Bob", "");
        bob.last_played = Some(now() - Duration::days(5));
        bob.total_games = 4;
        let mut carol = User::new("Carol", "");
        carol.is_blacklisted = true;

        let ids = (alice.id, bob.id, carol.id);
        let mut roster = Roster::new(
            UserRegistry::from_users(vec![alice, bob, carol]),
            HistoryLog::default(),
        );
        roster.toggle_presence(ids.0).unwrap();
        roster.toggle_presence(ids.1).unwrap();
        (roster, ids.0, ids.1, ids.2)
    }

    #[test]
    fn test_blacklisted_user_cannot_be_present() {
        let (mut roster, _, _, carol) = scenario();

        assert_eq!(roster.toggle_presence(carol), Err(RosterError::Blacklisted(carol)));
        assert!(!roster.is_present(carol));
    }

    #[test]
    fn test_draw_excludes_blacklisted() {
        let (mut roster, alice, bob, carol) = scenario();
        let carol_before = roster.user(carol).cloned();

        let outcome = roster.request_draw(2, now(), &mut rng()).unwrap();

        let mut winner_ids: Vec<Uuid> = outcome.winners.iter().map(|u| u.id).collect();
        winner_ids.sort();
        let mut expected = vec![alice, bob];
        expected.sort();
        assert_eq!(winner_ids, expected);
        assert_eq!(roster.user(carol).cloned(), carol_before);
    }

    #[test]
    fn test_draw_with_overflowing_weights_commits_nothing() {
        let mut roster = Roster::default().with_never_played_days(4_000_000_000);
        let ids: Vec<Uuid> = ["Anna", "Ben"]
            .iter()
            .map(|name| roster.add_user(name, "").unwrap().id)
            .collect();
        for id in &ids {
            roster.toggle_presence(*id).unwrap();
        }

        let result = roster.request_draw(2, now(), &mut rng());

        assert_eq!(result.unwrap_err(), RosterError::DrawIncomplete { expected: 2, drawn: 0 });
        assert!(roster.history().is_empty());
        for id in &ids {
            let user = roster.user(*id).unwrap();
            assert_eq!(user.total_games, 0);
            assert_eq!(user.last_played, None);
            assert_eq!(roster.session_games(*id), 0);
        }
    }

    #[test]
    fn test_draw_commits_only_winners() {
        let mut roster = Roster::default();
        let ids: Vec<Uuid> = ["Anna", "Ben", "Cleo", "Dirk"]
            .iter()
            .map(|name| roster.add_user(name, "").unwrap().id)
            .collect();
        for id in &ids {
            roster.toggle_presence(*id).unwrap();
        }
        let before: Vec<User> = ids.iter().map(|id| roster.user(*id).cloned().unwrap()).collect();

        let outcome = roster.request_draw(2, now(), &mut rng()).unwrap();
        assert_eq!(outcome.winners.len(), 2);

        for old in before {
            let new = roster.user(old.id).unwrap();
            if outcome.winners.iter().any(|w| w.id == old.id) {
                assert_eq!(new.total_games, old.total_games + 1);
                assert_eq!(new.last_played, Some(now()));
                assert_eq!(roster.session_games(old.id), 1);
            } else {
                assert_eq!(new, &old);
                assert_eq!(roster.session_games(old.id), 0);
            }
        }
    }

    #[test]
    fn test_draw_appends_history() {
        let (mut roster, _, _, _) = scenario();

        let outcome = roster.request_draw(1, now(), &mut rng()).unwrap();

        assert_eq!(outcome.history.len(), 1);
        assert_eq!(outcome.history[0].timestamp, now());
        assert_eq!(outcome.history[0].players, vec![outcome.winners[0].display_name()]);
        assert_eq!(roster.history(), outcome.history);
    }

    #[test]
    fn test_draw_with_empty_pool_mutates_nothing() {
        let mut roster = Roster::default();
        let id = roster.add_user("Solo", "").unwrap().id;

        assert!(matches!(
            roster.request_draw(1, now(), &mut rng()),
            Err(RosterError::EmptyPool)
        ));
        assert!(roster.history().is_empty());

        // present but paused is still an empty pool
        roster.toggle_presence(id).unwrap();
        roster.toggle_pause(id).unwrap();
        assert!(matches!(
            roster.request_draw(1, now(), &mut rng()),
            Err(RosterError::EmptyPool)
        ));
        assert_eq!(roster.user(id).unwrap().total_games, 0);
    }

    #[test]
    fn test_paused_users_are_not_candidates() {
        let (mut roster, alice, bob, _) = scenario();
        roster.toggle_pause(bob).unwrap();

        let candidates: Vec<Uuid> = roster.candidates().iter().map(|u| u.id).collect();
        assert_eq!(candidates, vec![alice]);
    }

    #[test]
    fn test_blacklisting_present_user_evicts() {
        let (mut roster, alice, _, _) = scenario();
        roster.toggle_pause(alice).unwrap();

        assert_eq!(roster.toggle_blacklist(alice), Ok(true));
        assert!(!roster.is_present(alice));
        assert!(!roster.is_paused(alice));
        assert!(roster.user(alice).unwrap().is_blacklisted);

        // lifting the ban does not restore presence
        assert_eq!(roster.toggle_blacklist(alice), Ok(false));
        assert!(!roster.is_present(alice));
    }

    #[test]
    fn test_pause_requires_presence() {
        let (mut roster, _, _, carol) = scenario();
        assert_eq!(roster.toggle_pause(carol), Err(RosterError::NotPresent(carol)));
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let mut roster = Roster::default();
        let ghost = Uuid::new_v4();

        assert_eq!(roster.toggle_presence(ghost), Err(RosterError::NotFound(ghost)));
        assert_eq!(roster.toggle_pause(ghost), Err(RosterError::NotFound(ghost)));
        assert_eq!(roster.toggle_blacklist(ghost), Err(RosterError::NotFound(ghost)));
        assert!(matches!(roster.delete_user(ghost), Err(RosterError::NotFound(_))));
    }

    #[test]
    fn test_delete_cascades() {
        let (mut roster, alice, _, _) = scenario();
        roster.toggle_pause(alice).unwrap();
        roster.request_draw(2, now(), &mut rng()).ok();

        roster.delete_user(alice).unwrap();

        assert!(roster.user(alice).is_none());
        assert!(!roster.is_present(alice));
        assert!(!roster.is_paused(alice));
        assert_eq!(roster.session_games(alice), 0);
    }

    #[test]
    fn test_clear_presence() {
        let (mut roster, alice, _, _) = scenario();
        roster.toggle_pause(alice).unwrap();

        roster.clear_presence();

        assert_eq!(roster.present_count(), 0);
        assert_eq!(roster.paused_count(), 0);
        assert!(roster.candidates().is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let (mut roster, _, _, _) = scenario();

        for i in 0..35 {
            roster
                .request_draw(1, now() + Duration::minutes(i), &mut rng())
                .unwrap();
        }

        let history = roster.history();
        assert_eq!(history.len(), 30);
        assert_eq!(history[0].timestamp, now() + Duration::minutes(34));
        assert_eq!(history[29].timestamp, now() + Duration::minutes(5));
    }

    #[test]
    fn test_pechvogel() {
        let (roster, alice, bob, _) = scenario();

        let top: Vec<Uuid> = roster.pechvogel(5, now()).iter().map(|u| u.id).collect();
        assert_eq!(top, vec![alice, bob]);
    }
}
