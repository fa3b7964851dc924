use crate::core::error::ValidationError;
use crate::models::user::User;
use crate::validation::params::{parse_bulk_line, validate_names};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of a bulk import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkImportReport {
    pub added: usize,
    pub skipped: usize,
}

/// Ordered collection of known users
///
/// Users are kept sorted by (first name, last name), case-insensitively.
/// The registry is the sole owner of each user value; updates replace the
/// stored value for an identity.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: Vec<User>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self { users: Vec::new() }
    }

    /// Build a registry from already-constructed users (e.g. loaded from disk).
    ///
    /// Users whose id is already taken are given a fresh id.
    pub fn from_users(users: Vec<User>) -> Self {
        let mut registry = Self::new();
        for mut user in users {
            if registry.contains(user.id) {
                let fresh = Uuid::new_v4();
                tracing::warn!(
                    duplicate_id = %user.id,
                    new_id = %fresh,
                    name = %user.display_name(),
                    "Duplicate user id, assigning a fresh one"
                );
                user.id = fresh;
            }
            registry.users.push(user);
        }
        registry.sort();
        registry
    }

    /// Create and store a new user
    pub fn add(&mut self, first: &str, last: &str) -> Result<User, ValidationError> {
        let (first, last) = validate_names(first, last)?;
        let user = User::new(first, last);
        self.users.push(user.clone());
        self.sort();
        Ok(user)
    }

    /// Add one user per line, skipping names already present verbatim
    pub fn bulk_add<'a, I>(&mut self, lines: I) -> BulkImportReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = BulkImportReport::default();

        for line in lines {
            let Some((first, last)) = parse_bulk_line(line) else {
                continue;
            };

            if self.find_exact(&first, &last).is_some() {
                tracing::debug!(first = %first, last = %last, "Bulk import: duplicate skipped");
                report.skipped += 1;
                continue;
            }

            self.users.push(User::new(first, last));
            report.added += 1;
        }

        if report.added > 0 {
            self.sort();
        }

        report
    }

    /// Remove a user, returning it if it existed
    pub fn delete(&mut self, id: Uuid) -> Option<User> {
        let pos = self.users.iter().position(|u| u.id == id)?;
        Some(self.users.remove(pos))
    }

    pub fn get(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    /// Replace the stored value for `user.id`.
    ///
    /// Returns the previous value, or `None` (and stores nothing) if the
    /// identity is unknown.
    pub fn replace(&mut self, user: User) -> Option<User> {
        let slot = self.users.iter_mut().find(|u| u.id == user.id)?;
        let previous = std::mem::replace(slot, user);
        self.sort();
        Some(previous)
    }

    /// Exact, case-sensitive match on both names
    pub fn find_exact(&self, first: &str, last: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.first_name == first && u.last_name == last)
    }

    /// Users whose display name contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<&User> {
        let needle = query.trim().to_lowercase();
        self.users
            .iter()
            .filter(|u| needle.is_empty() || u.display_name().to_lowercase().contains(&needle))
            .collect()
    }

    /// All users in display order
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn sort(&mut self) {
        self.users.sort_by_cached_key(User::sort_key);
    }
}
