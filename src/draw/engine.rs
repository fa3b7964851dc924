//! Weighted draw without replacement.
//!
//! Each round picks one user from the remaining pool with probability
//! proportional to `(days_since_last_play + 1)^2`, then removes the pick from
//! the pool. Weights do not change during a draw, but the shrinking pool
//! renormalises the odds from round to round.

use crate::models::user::User;
use crate::utils::time::days_since;
use chrono::{DateTime, Utc};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use tracing::warn;

/// Days assumed for a user who has never played
pub const NEVER_PLAYED_DAYS: i64 = 999;

/// Largest accepted `never_played_days`; keeps summed weights well inside `u64`
pub const MAX_NEVER_PLAYED_DAYS: i64 = 1_000_000;

/// Days the user has been waiting, `never_played_days` if they never played
pub fn days_waiting(user: &User, now: DateTime<Utc>, never_played_days: i64) -> i64 {
    match user.last_played {
        Some(last) => days_since(last, now),
        None => never_played_days,
    }
}

/// Selection weight, always at least 1
pub fn weight(user: &User, now: DateTime<Utc>, never_played_days: i64) -> u64 {
    let days = days_waiting(user, now, never_played_days).max(0) as u64;
    let base = days.saturating_add(1);
    base.saturating_mul(base)
}

/// Draw up to `count` distinct winners from `candidates`.
///
/// The result has `min(count, candidates.len())` entries, in draw order. If
/// the weights cannot form a distribution (their sum overflows) the draw stops
/// early and returns fewer; callers must check the length before committing.
pub fn draw_winners<R>(
    candidates: &[User],
    count: usize,
    now: DateTime<Utc>,
    never_played_days: i64,
    rng: &mut R,
) -> Vec<User>
where
    R: Rng + ?Sized,
{
    let mut pool: Vec<(&User, u64)> = candidates
        .iter()
        .map(|u| (u, weight(u, now, never_played_days)))
        .collect();

    let rounds = count.min(pool.len());
    let mut winners = Vec::with_capacity(rounds);

    for _ in 0..rounds {
        let dist = match WeightedIndex::new(pool.iter().map(|(_, w)| *w)) {
            Ok(dist) => dist,
            Err(e) => {
                warn!(error = %e, remaining = pool.len(), "Cannot build weighted distribution, stopping draw");
                break;
            }
        };

        let (winner, _) = pool.swap_remove(dist.sample(rng));
        winners.push(winner.clone());
    }

    winners
}

/// The `n` candidates who have waited longest, never-played first.
///
/// Ties keep the candidates' existing order.
pub fn longest_waiting<'a>(
    candidates: &[&'a User],
    n: usize,
    now: DateTime<Utc>,
    never_played_days: i64,
) -> Vec<&'a User> {
    let mut ranked: Vec<&User> = candidates.to_vec();
    ranked.sort_by_key(|u| {
        let never = u.last_played.is_none();
        std::cmp::Reverse((never, days_waiting(u, now, never_played_days)))
    });
    ranked.truncate(n);
    ranked
}
